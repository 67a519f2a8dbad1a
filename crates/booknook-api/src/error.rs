use thiserror::Error;

/// Top-level error type for the `booknook-api` crate.
///
/// Every failed HTTP exchange lands in exactly one variant. Status-derived
/// variants keep the server's `message` field (when the body carried one)
/// so `booknook-core` can surface it verbatim in its error slot.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication / authorization ──────────────────────────────
    /// Missing, invalid, or expired token (HTTP 401).
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("missing or invalid token"))]
    Unauthorized { message: Option<String> },

    /// Authenticated, but the role does not allow the call (HTTP 403).
    #[error("Forbidden: {}", .message.as_deref().unwrap_or("insufficient permissions"))]
    Forbidden { message: Option<String> },

    // ── Resource / payload ──────────────────────────────────────────
    /// The addressed resource does not exist (HTTP 404).
    #[error("Not found: {}", .message.as_deref().unwrap_or("resource does not exist"))]
    NotFound { message: Option<String> },

    /// The server rejected the submitted data (HTTP 400, 409, 422).
    #[error("Rejected (HTTP {status}): {}", .message.as_deref().unwrap_or("invalid request"))]
    Validation {
        status: u16,
        message: Option<String>,
    },

    /// 5xx or any other unexpected status.
    #[error("Server error (HTTP {status}): {}", .message.as_deref().unwrap_or("unexpected response"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the underlying HTTP client failed (bad CA file, TLS backend).
    #[error("Client setup failed: {0}")]
    ClientSetup(String),

    /// The token contains bytes that cannot be sent as a header value.
    #[error("Token is not a valid header value")]
    InvalidToken,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server rejected the credential token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the request never produced an HTTP response.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Transport(e) => e.status().is_none(),
            _ => false,
        }
    }

    /// The message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Validation { message, .. }
            | Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Map a non-success status and an optional server message to a variant.
    pub(crate) fn from_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            400 | 409 | 422 => Self::Validation {
                status: status.as_u16(),
                message,
            },
            other => Self::Server {
                status: other,
                message,
            },
        }
    }
}
