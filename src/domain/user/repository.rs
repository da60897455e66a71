//! User repository interface

use async_trait::async_trait;

use super::model::{User, UserRole};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with Conflict if the email is taken.
    async fn save(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Update profile/credential fields of an existing user
    async fn update(&self, user: User) -> DomainResult<()>;

    /// Change a user's role (admin operation)
    async fn set_role(&self, id: &str, role: UserRole) -> DomainResult<()>;

    /// Deactivate an account (admin operation, soft delete)
    async fn deactivate(&self, id: &str) -> DomainResult<()>;

    /// Paginated listing, newest first
    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<User>, u64)>;

    async fn count(&self) -> DomainResult<u64>;
}
