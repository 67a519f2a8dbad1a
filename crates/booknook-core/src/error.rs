// ── Core error types ──
//
// Domain-level failures surfaced by the managers. Consumers never match on
// HTTP status codes: the `From<booknook_api::Error>` impl folds transport
// and status errors into the six-way taxonomy below.

use std::fmt;

use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing::debug;

/// Failure classification shown to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum ErrorKind {
    /// The service could not be reached or timed out.
    Network,
    /// No credential, or the server rejected it.
    Unauthorized,
    /// Authenticated but not permitted.
    Forbidden,
    NotFound,
    /// Input rejected locally or by the server.
    Validation,
    /// 5xx, unexpected status, or an undecodable body.
    Server,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Cannot reach the library service: {reason}")]
    Network { reason: String },

    // ── Access ───────────────────────────────────────────────────────
    #[error("Authentication required: {}", .message.as_deref().unwrap_or("missing or expired token"))]
    Unauthorized { message: Option<String> },

    #[error("Permission denied: {}", .message.as_deref().unwrap_or("administrator access required"))]
    Forbidden { message: Option<String> },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Not found: {}", .message.as_deref().unwrap_or("no such record"))]
    NotFound { message: Option<String> },

    #[error("Validation failed: {}", .message.as_deref().unwrap_or("invalid input"))]
    Validation { message: Option<String> },

    #[error("Server error{}: {}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default(), .message.as_deref().unwrap_or("unexpected response"))]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// A local validation failure with a display message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            message: Some(message.into()),
        }
    }

    /// Raised before any request when no credential is held.
    pub(crate) fn signed_out() -> Self {
        Self::Unauthorized {
            message: Some("You must be logged in".into()),
        }
    }

    /// Raised before any request when the session is not an admin.
    pub(crate) fn admin_only() -> Self {
        Self::Forbidden {
            message: Some("Administrator access required".into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } | Self::Config { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The display message carried by the failure, if any.
    ///
    /// Server-originated variants carry the body's `message`; local
    /// validation and gating errors carry their own text. Network and
    /// decoding failures carry none, so callers fall back to a
    /// per-operation message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Validation { message }
            | Self::Server { message, .. } => message.as_deref(),
            Self::Network { .. } | Self::Config { .. } => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<booknook_api::Error> for CoreError {
    fn from(err: booknook_api::Error) -> Self {
        use booknook_api::Error as Api;

        match err {
            Api::Unauthorized { message } => CoreError::Unauthorized { message },
            Api::Forbidden { message } => CoreError::Forbidden { message },
            Api::NotFound { message } => CoreError::NotFound { message },
            Api::Validation { message, .. } => CoreError::Validation { message },
            Api::Server { status, message } => CoreError::Server {
                status: Some(status),
                message,
            },
            Api::Transport(e) => {
                if let Some(status) = e.status() {
                    CoreError::Server {
                        status: Some(status.as_u16()),
                        message: None,
                    }
                } else if e.is_timeout() {
                    CoreError::Network {
                        reason: "request timed out".into(),
                    }
                } else {
                    CoreError::Network {
                        reason: e.to_string(),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid API URL: {e}"),
            },
            Api::ClientSetup(message) => CoreError::Config { message },
            Api::InvalidToken => CoreError::Unauthorized {
                message: Some("Stored token is malformed".into()),
            },
            Api::Deserialization { message, body: _ } => {
                debug!(%message, "undecodable response body");
                CoreError::Server {
                    status: None,
                    message: None,
                }
            }
        }
    }
}

// ── Error slot value ─────────────────────────────────────────────────

/// What a manager's error slot holds after a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    /// Server-reported reason when present, else the operation's fallback.
    pub message: String,
}

impl Failure {
    pub fn new(err: &CoreError, fallback: &str) -> Self {
        Self {
            kind: err.kind(),
            message: err.server_message().unwrap_or(fallback).to_owned(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
