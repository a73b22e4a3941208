/**
 * Admin Roles and Profiles
 *
 * Roles are stored as text in the account store. Comparisons are
 * case-insensitive so `admin`, `Admin` and `ADMIN` are the same role.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Admin,
    Moderator,
    User,
}

impl Role {
    /// Canonical spelling used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Moderator => "Moderator",
            Role::User => "User",
        }
    }

    /// Case-insensitive match against a stored role string
    pub fn matches(&self, stored: &str) -> bool {
        stored.trim().eq_ignore_ascii_case(self.as_str())
    }

    /// Parse a role name, ignoring case
    pub fn parse(raw: &str) -> Option<Role> {
        [Role::Admin, Role::Moderator, Role::User]
            .into_iter()
            .find(|role| role.matches(raw))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin account as returned by the API (never includes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_matches_ignores_case() {
        assert!(Role::Admin.matches("admin"));
        assert!(Role::Admin.matches("ADMIN"));
        assert!(!Role::Admin.matches("moderator"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("moderator"), Some(Role::Moderator));
        assert_eq!(Role::parse("owner"), None);
    }
}
