//! Domain errors

use thiserror::Error;

/// Domain-level error taxonomy.
///
/// Every failing operation reports one of these kinds synchronously to the
/// caller; the HTTP layer maps them to status codes in one place.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let e = DomainError::not_found("Booking", "abc");
        assert_eq!(e.to_string(), "Not found: Booking with id=abc");
    }

    #[test]
    fn forbidden_is_distinguishable() {
        let e = DomainError::Forbidden("no access".into());
        assert!(matches!(e, DomainError::Forbidden(_)));
        assert!(e.to_string().contains("no access"));
    }
}
