use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: '{0}' requires the Admin role")]
    AdminRequired(&'static str),
}

/// Guard for administrative actions (user management, scheduling).
///
/// `action` names the operation for the error message.
pub fn require_admin(role: Role, action: &'static str) -> Result<(), AuthzError> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_pass() {
        assert!(require_admin(Role::Admin, "users.create").is_ok());
        assert_eq!(
            require_admin(Role::Auditor, "users.create"),
            Err(AuthzError::AdminRequired("users.create"))
        );
    }
}
