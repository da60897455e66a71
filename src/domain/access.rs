//! Flat permission predicates
//!
//! Every mutating or privacy-sensitive operation is guarded by one of these
//! checks. There is no role hierarchy: each operation names the roles and
//! ownership relations it accepts, and an admin always passes.

use crate::domain::user::UserRole;
use crate::domain::{DomainError, DomainResult};

/// The authenticated caller of an operation.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Caller must hold one of the listed roles.
pub fn ensure_role(actor: &Actor, allowed: &[UserRole], action: &str) -> DomainResult<()> {
    if allowed.contains(&actor.role) {
        return Ok(());
    }
    Err(DomainError::Forbidden(format!(
        "Role '{}' may not {}",
        actor.role, action
    )))
}

/// Caller must be the referenced user, or an admin.
pub fn ensure_self_or_admin(actor: &Actor, user_id: &str, action: &str) -> DomainResult<()> {
    if actor.id == user_id || actor.is_admin() {
        return Ok(());
    }
    Err(DomainError::Forbidden(format!("Not allowed to {}", action)))
}

/// Caller must own the related entity (e.g. the parking space of a booking),
/// or be an admin.
pub fn ensure_owner_or_admin(actor: &Actor, owner_id: &str, action: &str) -> DomainResult<()> {
    if actor.id == owner_id || actor.is_admin() {
        return Ok(());
    }
    Err(DomainError::Forbidden(format!("Not allowed to {}", action)))
}
