use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stocktake_core::DomainError;

/// Account role.
///
/// Admins manage users and schedule audits; auditors only count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Auditor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Auditor => "Auditor",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "auditor" => Ok(Role::Auditor),
            other => Err(DomainError::validation(format!(
                "unknown role '{other}' (expected Admin or Auditor)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" AUDITOR ".parse::<Role>().unwrap(), Role::Auditor);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Role::Auditor).unwrap(), "\"Auditor\"");
    }
}
