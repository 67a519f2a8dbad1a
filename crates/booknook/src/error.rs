//! CLI error types with miette diagnostics.
//!
//! Maps core failures into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use booknook_config::ConfigError;
use booknook_core::{CoreError, ErrorKind, Failure};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the library at {url}")]
    #[diagnostic(
        code(booknook::connection_failed),
        help(
            "{reason}\n\
             Check that the service is running, or point elsewhere with --api-url."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Access ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(booknook::auth_required), help("Run: booknook login"))]
    AuthRequired { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(booknook::permission_denied),
        help("This command needs an administrator account.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(booknook::not_found), help("Run: booknook {list_command} to see what exists"))]
    NotFound {
        message: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(booknook::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(booknook::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(booknook::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: booknook config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(booknook::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(booknook::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthRequired { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Turn a manager's error slot into a CLI error.
    ///
    /// `url` names the service for connection failures; `list_command`
    /// is suggested when something was not found.
    pub fn from_failure(failure: Failure, url: &str, list_command: &str) -> Self {
        let Failure { kind, message } = failure;
        match kind {
            ErrorKind::Network => Self::ConnectionFailed {
                url: url.into(),
                reason: message,
            },
            ErrorKind::Unauthorized => Self::AuthRequired { message },
            ErrorKind::Forbidden => Self::PermissionDenied { message },
            ErrorKind::NotFound => Self::NotFound {
                message,
                list_command: list_command.into(),
            },
            ErrorKind::Validation => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            ErrorKind::Server => Self::ApiError { message },
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Validation {
                field: "api_url".into(),
                reason: message,
            },
            other => {
                let failure = Failure::new(&other, &other.to_string());
                Self::from_failure(failure, "(configured API)", "books list")
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(see: booknook config profiles)".into(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_map_to_exit_codes() {
        let cases = [
            (ErrorKind::Network, exit_code::CONNECTION),
            (ErrorKind::Unauthorized, exit_code::AUTH),
            (ErrorKind::Forbidden, exit_code::PERMISSION),
            (ErrorKind::NotFound, exit_code::NOT_FOUND),
            (ErrorKind::Validation, exit_code::USAGE),
            (ErrorKind::Server, exit_code::GENERAL),
        ];
        for (kind, code) in cases {
            let failure = Failure {
                kind,
                message: "boom".into(),
            };
            let err = CliError::from_failure(failure, "http://localhost:5000/api", "books list");
            assert_eq!(err.exit_code(), code, "{kind}");
        }
    }

    #[test]
    fn unknown_profile_becomes_profile_not_found() {
        let err = CliError::from(ConfigError::UnknownProfile {
            name: "campus".into(),
        });
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "campus"));
    }
}
