// ── Library facade ──
//
// Wires one API client, one session, and the two data managers together.
// The session is shared with the managers as an `Arc`; there is no
// global.

use std::sync::Arc;

use booknook_api::LibraryClient;
use tracing::debug;

use crate::access::{Access, View};
use crate::admin::AdminConsole;
use crate::catalog::CatalogClient;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::session::SessionManager;
use crate::token::TokenStore;

/// The main entry point for front ends.
///
/// Construct with [`Library::new`], call [`start`](Self::start) to pick
/// up a persisted session, then drive the managers.
pub struct Library {
    config: ClientConfig,
    session: Arc<SessionManager>,
    catalog: CatalogClient,
    admin: AdminConsole,
}

impl Library {
    /// Build the HTTP client from `config`. Does not touch the network.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let api = LibraryClient::new(config.api_url.as_str(), &config.transport())?;
        Ok(Self::with_client(config, api, tokens))
    }

    /// Use an existing API client (tests, custom transports).
    pub fn with_client(config: ClientConfig, api: LibraryClient, tokens: Arc<dyn TokenStore>) -> Self {
        debug!(api = %api.base_url(), "library client ready");
        let session = Arc::new(SessionManager::new(api.clone(), tokens));
        let catalog = CatalogClient::new(
            api.clone(),
            Arc::clone(&session),
            config.page_size,
            config.preview_size,
        );
        let admin = AdminConsole::new(api, Arc::clone(&session), config.loan_period_days);
        Self {
            config,
            session,
            catalog,
            admin,
        }
    }

    /// Restore a persisted session, if any. See
    /// [`SessionManager::restore_session`].
    pub async fn start(&self) -> bool {
        self.session.restore_session().await
    }

    /// End the session. The managers drop their user-scoped views through
    /// the session's sign-out hooks; their error slots are cleared here.
    pub fn logout(&self) {
        self.session.logout();
        self.catalog.clear_error();
        self.admin.clear_error();
    }

    pub fn access(&self, view: View) -> Access {
        self.session.session().access(view)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn admin(&self) -> &AdminConsole {
        &self.admin
    }
}
