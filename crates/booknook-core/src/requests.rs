// ── Typed inputs for manager operations ──
//
// Form-shaped structs the front end fills in. Secrets stay wrapped in
// `SecretString` until the wire body is built.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;
use crate::model::Role;

// ── Session ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

/// Optional password change attached to a profile update.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
}

impl PasswordChange {
    /// Checks the profile form applies before submitting.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.current.expose_secret().is_empty() {
            return Err(CoreError::invalid("Current password is required"));
        }
        if self.new.expose_secret() != self.confirm.expose_secret() {
            return Err(CoreError::invalid("New passwords do not match"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    /// `None`, or a change whose new password is empty, leaves the
    /// password alone.
    pub password: Option<PasswordChange>,
}

impl ProfileChanges {
    /// The password change to submit, after validation.
    pub(crate) fn password_change(&self) -> Result<Option<&PasswordChange>, CoreError> {
        match &self.password {
            Some(change) if !change.new.expose_secret().is_empty() => {
                change.validate()?;
                Ok(Some(change))
            }
            _ => Ok(None),
        }
    }
}

// ── Admin: users ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Blank or whitespace-only keeps the stored password.
    pub password: Option<SecretString>,
}

impl UserUpdate {
    pub(crate) fn new_password(&self) -> Option<&str> {
        self.password
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|p| !p.trim().is_empty())
    }
}

// ── Admin: books ───────────────────────────────────────────────────

/// Body of the add and edit book forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub image_url: Option<String>,
}

impl BookInput {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::invalid("Title is required"));
        }
        if self.author.trim().is_empty() {
            return Err(CoreError::invalid("Author is required"));
        }
        Ok(())
    }

    pub(crate) fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn changes(current: &str, new: &str, confirm: &str) -> ProfileChanges {
        ProfileChanges {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: Some(PasswordChange {
                current: secret(current),
                new: secret(new),
                confirm: secret(confirm),
            }),
        }
    }

    #[test]
    fn new_password_needs_current() {
        let err = changes("", "n3w", "n3w").password_change().unwrap_err();
        assert_eq!(err.server_message(), Some("Current password is required"));
    }

    #[test]
    fn new_password_must_match_confirmation() {
        let err = changes("old", "n3w", "n3x").password_change().unwrap_err();
        assert_eq!(err.server_message(), Some("New passwords do not match"));
    }

    #[test]
    fn empty_new_password_skips_the_change() {
        assert!(changes("", "", "whatever").password_change().unwrap().is_none());
        assert!(changes("old", "n3w", "n3w").password_change().unwrap().is_some());
    }

    #[test]
    fn blank_admin_password_is_omitted() {
        let mut update = UserUpdate {
            username: "bob".into(),
            email: "bob@example.com".into(),
            role: Role::User,
            password: Some(secret("   ")),
        };
        assert_eq!(update.new_password(), None);
        update.password = Some(secret("hunter2"));
        assert_eq!(update.new_password(), Some("hunter2"));
    }

    #[test]
    fn book_form_requires_title_and_author() {
        let mut input = BookInput {
            title: " ".into(),
            author: "Frank Herbert".into(),
            ..BookInput::default()
        };
        assert!(input.validate().is_err());
        input.title = "Dune".into();
        assert!(input.validate().is_ok());
        input.image_url = Some("  ".into());
        assert_eq!(input.image_url(), None);
    }
}
