//! User accounts.
//!
//! Usernames are unique and compared exactly. The password hash never leaves
//! this crate or the user directory: callers see [`UserProfile`].

use serde::{Deserialize, Serialize};

use stocktake_core::{DomainError, DomainResult, Entity};

use crate::Role;
use crate::password::{PasswordError, hash_password};

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Stored account, including its Argon2 password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    name: String,
    role: Role,
    password_hash: String,
}

impl User {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn verify_password(&self, password: &str) -> bool {
        crate::password::verify_password(password, &self.password_hash)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

impl Entity for User {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.username
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub name: String,
    pub role: Role,
}

// ─────────────────────────────────────────────────────────────────────────────
// NewUser
// ─────────────────────────────────────────────────────────────────────────────

/// Registration request for a new account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl NewUser {
    /// Validate fields and hash the password.
    ///
    /// Username and display name are trimmed; the password is taken as-is.
    pub fn into_user(self) -> DomainResult<User> {
        let username = self.username.trim();
        let name = self.name.trim();

        if username.is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("username must not contain whitespace"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }

        let password_hash = hash_password(&self.password)
            .map_err(|PasswordError::Hash(msg)| DomainError::invariant(msg))?;

        Ok(User {
            username: username.to_string(),
            name: name.to_string(),
            role: self.role,
            password_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            username: " ana ".to_string(),
            password: "hunter2".to_string(),
            name: "Ana Ruiz".to_string(),
            role: Role::Auditor,
        }
    }

    #[test]
    fn into_user_trims_and_hashes() {
        let user = new_user().into_user().unwrap();
        assert_eq!(user.username(), "ana");
        assert_eq!(user.id(), "ana");
        assert_ne!(user.password_hash(), "hunter2");
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
        assert!(!user.is_admin());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut u = new_user();
        u.username = "  ".to_string();
        assert!(matches!(u.into_user(), Err(DomainError::Validation(_))));

        let mut u = new_user();
        u.name.clear();
        assert!(matches!(u.into_user(), Err(DomainError::Validation(_))));

        let mut u = new_user();
        u.password.clear();
        assert!(matches!(u.into_user(), Err(DomainError::Validation(_))));

        let mut u = new_user();
        u.username = "ana ruiz".to_string();
        assert!(matches!(u.into_user(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn profile_omits_hash() {
        let user = new_user().into_user().unwrap();
        let json = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(json["username"], "ana");
        assert_eq!(json["role"], "Auditor");
        assert!(json.get("password_hash").is_none());
    }
}
