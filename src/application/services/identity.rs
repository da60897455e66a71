//! Identity service — registration, login, profile management
//!
//! All user-related business logic lives here. HTTP handlers should be thin
//! wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::access::{ensure_self_or_admin, Actor};
use crate::domain::provider::RepositoryProvider;
use crate::domain::user::{User, UserRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Profile fields a user may change about themselves
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new account. Self-registration is limited to the user and
    /// provider roles; admins are created through the bootstrap path.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
        role: &str,
    ) -> DomainResult<User> {
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let role = match role {
            "provider" => UserRole::Provider,
            _ => UserRole::User,
        };

        if self.repos.users().find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let hash = hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;
        let user = User::new(name, email, hash, phone, role);
        self.repos.users().save(user.clone()).await?;

        info!(user_id = %user.id, email = %user.email, role = %user.role, "New user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a JWT.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let user = self.repos.users().find_by_email(email).await?;
        let Some(mut user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.name, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        user.last_login_at = Some(Utc::now());
        self.repos.users().update(user.clone()).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        user_id: &str,
        update: ProfileUpdate,
    ) -> DomainResult<User> {
        ensure_self_or_admin(actor, user_id, "update this profile")?;

        let mut user = self.get_user(user_id).await?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(address) = update.address {
            user.address = Some(address);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = Utc::now();
        self.repos.users().update(user.clone()).await?;
        Ok(user)
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if new_password.len() < 8 {
            return Err(DomainError::Validation(
                "New password must be at least 8 characters".into(),
            ));
        }

        let mut user = self.get_user(&actor.id).await?;
        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        user.password_hash = hash_password(new_password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;
        user.updated_at = Utc::now();
        self.repos.users().update(user).await?;

        info!(user_id = %actor.id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::memory_repos;

    fn service(repos: Arc<dyn RepositoryProvider>) -> IdentityService {
        let jwt = JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "parkshare".into(),
        };
        IdentityService::new(repos, jwt)
    }

    #[tokio::test]
    async fn register_then_login() {
        let repos = memory_repos();
        let svc = service(repos);

        let user = svc
            .register("Kim", "kim@example.com", "password123", "010-1111-2222", "user")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::User);

        let auth = svc.login("kim@example.com", "password123").await.unwrap();
        assert_eq!(auth.user.id, user.id);
        assert_eq!(auth.token_type, "Bearer");
        assert!(auth.user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repos = memory_repos();
        let svc = service(repos);

        svc.register("Kim", "kim@example.com", "password123", "010-1111-2222", "user")
            .await
            .unwrap();
        let err = svc
            .register("Lee", "kim@example.com", "password456", "010-3333-4444", "user")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let repos = memory_repos();
        let svc = service(repos);

        svc.register("Kim", "kim@example.com", "password123", "010-1111-2222", "user")
            .await
            .unwrap();
        let err = svc.login("kim@example.com", "nope-nope-nope").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn cannot_self_register_as_admin() {
        let repos = memory_repos();
        let svc = service(repos);

        let user = svc
            .register("Mallory", "m@example.com", "password123", "010-0000-0000", "admin")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn other_user_cannot_update_profile() {
        let repos = memory_repos();
        let svc = service(repos);

        let target = svc
            .register("Kim", "kim@example.com", "password123", "010-1111-2222", "user")
            .await
            .unwrap();
        let attacker = Actor::new("someone-else", UserRole::User);
        let err = svc
            .update_profile(&attacker, &target.id, ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let repos = memory_repos();
        let svc = service(repos);

        let user = svc
            .register("Kim", "kim@example.com", "password123", "010-1111-2222", "user")
            .await
            .unwrap();
        let actor = Actor::new(user.id.clone(), user.role);

        let err = svc
            .change_password(&actor, "wrong-current", "newpassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        svc.change_password(&actor, "password123", "newpassword1")
            .await
            .unwrap();
        svc.login("kim@example.com", "newpassword1").await.unwrap();
    }
}
