// HTTP client for the BookNook REST API.
//
// Wraps `reqwest::Client` with base-URL handling, `x-auth-token` injection,
// and status/error-body mapping. Endpoint groups (account, books, admin)
// are implemented as inherent methods in sibling modules to keep this
// file focused on transport mechanics.

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AuthToken, TOKEN_HEADER};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape: `{ "message": "..." }`. Some routes use `msg`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default, alias = "msg")]
    message: Option<String>,
}

/// Async client for the library REST API.
///
/// Stateless with respect to authentication: every authenticated call
/// takes the [`AuthToken`] explicitly, so the session layer stays the
/// single owner of the credential.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LibraryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from the API root (e.g. `https://library.example/api`) and a
    /// transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the API root ends with a slash and can carry path segments.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::ClientSetup(format!(
                "API URL cannot carry a path: {raw}"
            )));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The API root every endpoint path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the API root, percent-encoding each one
    /// (ids are caller-supplied).
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(builder: RequestBuilder, token: Option<&AuthToken>) -> Result<RequestBuilder, Error> {
        match token {
            Some(token) => Ok(builder.header(TOKEN_HEADER, token.header_value()?)),
            None => Ok(builder),
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&AuthToken>,
    ) -> Result<T, Error> {
        debug!("GET {url}");
        let builder = Self::authorize(self.http.get(url), token)?;
        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
        token: Option<&AuthToken>,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let builder = Self::authorize(self.http.post(url).json(body), token)?;
        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
        token: Option<&AuthToken>,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let builder = Self::authorize(self.http.put(url).json(body), token)?;
        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url, token: Option<&AuthToken>) -> Result<(), Error> {
        debug!("DELETE {url}");
        let builder = Self::authorize(self.http.delete(url), token)?;
        let resp = builder.send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode(&body)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        trace!(%status, body = %preview(&raw), "error response");

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty());

        Error::from_status(status, message)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        }
    })
}

/// Mutation responses come either bare (`{ "_id": ... }`) or wrapped as
/// `{ "message": "...", "<key>": { ... } }`. Unwrap the latter.
pub(crate) fn unwrap_entity<T: DeserializeOwned>(
    value: serde_json::Value,
    key: &str,
) -> Result<T, Error> {
    let inner = match value {
        serde_json::Value::Object(mut map) if map.get(key).is_some_and(|v| v.is_object()) => {
            map.remove(key).unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: inner.to_string(),
    })
}
