use stocktake_auth::{Role, User};

/// Authenticated caller for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    username: String,
    name: String,
    role: Role,
}

impl PrincipalContext {
    pub fn new(username: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            role,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<&User> for PrincipalContext {
    fn from(user: &User) -> Self {
        Self::new(user.username(), user.name(), user.role())
    }
}

/// Bearer token the request was authenticated with (needed for logout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(pub String);
