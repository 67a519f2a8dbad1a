// ── User domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Account role as reported by the server.
///
/// Anything other than `admin` is a plain user; the client never
/// promotes a role on its own.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Interpret a server-reported role string.
    pub fn from_reported(raw: Option<&str>) -> Self {
        match raw.map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            _ => Self::User,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Case-insensitive match on username or email.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.username.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
    }
}

/// The borrower embedded in a borrow request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_are_plain_users() {
        assert_eq!(Role::from_reported(Some("admin")), Role::Admin);
        assert_eq!(Role::from_reported(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::from_reported(Some("librarian")), Role::User);
        assert_eq!(Role::from_reported(None), Role::User);
    }

    #[test]
    fn user_match_covers_username_and_email() {
        let user = User {
            id: "u1".into(),
            username: "Ada".into(),
            email: "countess@example.com".into(),
            role: Role::User,
        };
        assert!(user.matches("ada"));
        assert!(user.matches("COUNTESS"));
        assert!(!user.matches("babbage"));
    }
}
