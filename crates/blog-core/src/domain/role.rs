use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Editor,
    Author,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Editor => "Editor",
            Role::Author => "Author",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Editor" => Ok(Role::Editor),
            "Author" => Ok(Role::Author),
            "User" => Ok(Role::User),
            other => Err(DomainError::InvalidArgument(format!(
                "Unknown role: '{}'",
                other
            ))),
        }
    }
}

/// Authorization policies applied to endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Any authenticated caller.
    Authenticated,
    RequireAdmin,
    RequireEditor,
    RequireAuthor,
}

impl Policy {
    /// Whether a caller holding `roles` satisfies this policy.
    pub fn allows(&self, roles: &[Role]) -> bool {
        let accepted: &[Role] = match self {
            Policy::Authenticated => return true,
            Policy::RequireAdmin => &[Role::Admin],
            Policy::RequireEditor => &[Role::Admin, Role::Editor],
            Policy::RequireAuthor => &[Role::Admin, Role::Editor, Role::Author],
        };
        roles.iter().any(|r| accepted.contains(r))
    }
}
