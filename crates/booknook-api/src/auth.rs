use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Header carrying the bearer credential on every authenticated call.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Opaque bearer token issued by `POST /auth/login`.
///
/// Wraps a [`SecretString`] so the value never shows up in `Debug`
/// output or logs. It is exposed only when building the request header.
#[derive(Debug, Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// The secret itself, for persistence layers that must write it out.
    pub fn secret(&self) -> &SecretString {
        &self.0
    }

    /// Build the `x-auth-token` header value, marked sensitive.
    pub(crate) fn header_value(&self) -> Result<HeaderValue, Error> {
        let mut value =
            HeaderValue::from_str(self.0.expose_secret()).map_err(|_| Error::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl From<SecretString> for AuthToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}
