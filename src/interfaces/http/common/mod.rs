//! Shared HTTP plumbing: response envelope, pagination, error mapping

pub mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::DomainError;

/// Standard response wrapper used by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Placeholder payload for responses that carry no data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Common pagination query parameters
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    /// Page number, 1-based
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Paginated list response
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            (total + limit as u64 - 1) / limit as u64
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Domain error carried out of a handler.
///
/// Handlers return `Result<_, ApiError>` and use `?` on service calls; the
/// status code mapping lives here and nowhere else.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Validation(_) | DomainError::Conflict(_) | DomainError::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Storage details stay in the logs, not in the response body
        let message = match &self.0 {
            DomainError::Storage(detail) => {
                tracing::error!(detail = %detail, "Storage error while handling request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<EmptyData>::error(message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_expected_status_codes() {
        assert_eq!(
            status_of(DomainError::not_found("Booking", "b-1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::Forbidden("nope".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(DomainError::Unauthorized("bad token".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Conflict("taken".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidState("too late".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Storage("db gone".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn paginated_response_computes_total_pages() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 101, 1, 50);
        assert_eq!(page.total_pages, 3);

        let exact = PaginatedResponse::<i32>::new(vec![], 100, 2, 50);
        assert_eq!(exact.total_pages, 2);

        let empty = PaginatedResponse::<i32>::new(vec![], 0, 1, 50);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn error_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::<EmptyData>::error("boom")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "boom");
        assert!(body.get("data").is_none());
    }
}
