// ── Runtime client configuration ──
//
// Describes how to reach the library service and how the views slice
// the data. Never touches disk: the config crate (or a test) builds a
// `ClientConfig` and hands it to `Library::new`.

use std::time::Duration;

use booknook_api::{TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_PREVIEW_SIZE: usize = 4;
pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000/api`.
    pub api_url: Url,
    /// Per-request timeout. Expiry surfaces as a Network failure.
    pub timeout: Duration,
    /// Catalog page size used by `page()`.
    pub page_size: usize,
    /// Cap on the unauthenticated featured preview.
    pub preview_size: usize,
    /// Days added to today for the default approval due date.
    pub loan_period_days: u32,
    pub user_agent: String,
    pub tls: TlsMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: transport.timeout,
            page_size: DEFAULT_PAGE_SIZE,
            preview_size: DEFAULT_PREVIEW_SIZE,
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            user_agent: transport.user_agent,
            tls: TlsMode::System,
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at `api_url`.
    pub fn for_url(api_url: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(api_url).map_err(|e| CoreError::Config {
            message: format!("Invalid API URL {api_url:?}: {e}"),
        })?;
        Ok(Self {
            api_url,
            ..Self::default()
        })
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library_views() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.preview_size, 4);
        assert_eq!(config.loan_period_days, 14);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn for_url_rejects_garbage() {
        assert!(ClientConfig::for_url("not a url").is_err());
        let config = ClientConfig::for_url("https://library.example/api").unwrap();
        assert_eq!(config.api_url.host_str(), Some("library.example"));
    }
}
