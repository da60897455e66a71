//! User domain entity

use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    /// Regular user: searches and books parking spaces
    User,
    /// Provider: lists and manages own parking spaces
    Provider,
    /// Administrator: full access
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "provider" => Self::Provider,
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique login identity
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: UserRole,
    pub address: Option<String>,
    pub avatar: Option<String>,
    /// Soft-delete flag; deactivated accounts cannot log in
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        phone: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            phone: phone.into(),
            role,
            address: None,
            avatar: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_active() {
        let u = User::new("Kim", "kim@example.com", "hash", "010-0000-0000", UserRole::User);
        assert!(u.is_active);
        assert!(u.last_login_at.is_none());
        assert_eq!(u.role, UserRole::User);
    }

    #[test]
    fn role_roundtrip() {
        for role in &[UserRole::User, UserRole::Provider, UserRole::Admin] {
            assert_eq!(&UserRole::from_str(role.as_str()), role);
        }
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(UserRole::from_str("superuser"), UserRole::User);
    }
}
