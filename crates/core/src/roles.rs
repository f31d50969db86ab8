//! Well-known role names and their typed form.
//!
//! The string constants must match the seed rows in
//! `db/migrations/20260301000001_create_roles_and_users.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_USER: &str = "user";

/// Staff role carried by an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Editor,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Editor => ROLE_EDITOR,
            Self::User => ROLE_USER,
        }
    }

    /// Parse a stored role name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_EDITOR => Some(Self::Editor),
            ROLE_USER => Some(Self::User),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_names() {
        for role in [Role::Admin, Role::Editor, Role::User] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_case_variants() {
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }
}
