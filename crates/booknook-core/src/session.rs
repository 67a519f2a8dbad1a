// ── Session manager ──
//
// Owns the credential token and the signed-in identity. The catalog and
// admin managers borrow the token from here and report rejected tokens
// back through `invalidate`. Any sign-out runs the hooks the managers
// registered, so no user-scoped view outlives the session.

use std::sync::{Arc, Mutex, PoisonError};

use booknook_api::types::UpdateProfileRequest;
use booknook_api::{AuthToken, LibraryClient};
use secrecy::ExposeSecret;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Failure};
use crate::model::{Role, User};
use crate::requests::{Credentials, NewAccount, ProfileChanges};
use crate::store::{HasStatus, StateCell, Status};
use crate::token::TokenStore;

const RESTORE_FAILED: &str = "Authentication failed";
const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";
const PROFILE_FAILED: &str = "Profile update failed";

/// Snapshot of who is signed in.
///
/// `is_authenticated` holds exactly when `user` is set. `is_admin` comes
/// from the role the server reported at login or restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_admin: bool,
    status: Status,
}

impl Session {
    pub(crate) fn signed_in(user: User) -> Self {
        Self {
            is_admin: user.role.is_admin(),
            is_authenticated: true,
            user: Some(user),
            status: Status::default(),
        }
    }

    /// A call is in flight (login, restore, register, profile update).
    pub fn pending(&self) -> bool {
        self.status.busy()
    }

    pub fn last_error(&self) -> Option<&Failure> {
        self.status.error()
    }

    fn sign_in(&mut self, user: User) {
        self.is_admin = user.role.is_admin();
        self.is_authenticated = true;
        self.user = Some(user);
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.is_admin = false;
    }
}

impl HasStatus for Session {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

type SignOutHook = Box<dyn Fn() + Send + Sync>;

pub struct SessionManager {
    api: LibraryClient,
    tokens: Arc<dyn TokenStore>,
    token: Mutex<Option<AuthToken>>,
    state: StateCell<Session>,
    /// Run after every sign-out, explicit or implicit.
    sign_out_hooks: Mutex<Vec<SignOutHook>>,
}

impl SessionManager {
    pub fn new(api: LibraryClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            token: Mutex::new(None),
            state: StateCell::new(Session::default()),
            sign_out_hooks: Mutex::new(Vec::new()),
        }
    }

    /// Register a hook that drops data owned by the signed-in user.
    pub(crate) fn on_sign_out(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.sign_out_hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub fn session(&self) -> Session {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.is_authenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.state.read(|s| s.is_admin)
    }

    /// The bearer token, if one is held.
    pub fn token(&self) -> Option<AuthToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Validate a persisted token against the profile endpoint.
    ///
    /// Returns `false` without a request when nothing was persisted. A
    /// rejected or unverifiable token is purged.
    pub async fn restore_session(&self) -> bool {
        let stored = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no persisted token");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "could not read persisted token");
                return false;
            }
        };
        self.set_token(Some(stored.clone()));

        let result = self
            .state
            .track(RESTORE_FAILED, async {
                Ok::<_, CoreError>(User::from(self.api.get_profile(&stored).await?))
            })
            .await;

        match result {
            Ok(user) => {
                info!(username = %user.username, role = %user.role, "session restored");
                self.state.update(|s| s.sign_in(user));
                true
            }
            Err(_) => {
                warn!("persisted token rejected, purging");
                self.purge_token();
                self.state.update(Session::sign_out);
                self.run_sign_out_hooks();
                false
            }
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> bool {
        let result = self
            .state
            .track(LOGIN_FAILED, async {
                let resp = self
                    .api
                    .login(&credentials.email, &credentials.password)
                    .await?;
                let token = AuthToken::new(resp.token.clone());
                let reported = resp
                    .reported_role()
                    .map(|r| Role::from_reported(Some(r)));

                let mut user = match resp.user {
                    Some(user) => User::from(user),
                    None => User::from(self.api.get_profile(&token).await?),
                };
                if let Some(role) = reported {
                    user.role = role;
                }
                Ok::<_, CoreError>((token, user))
            })
            .await;

        let Ok((token, user)) = result else {
            return false;
        };

        if let Err(e) = self.tokens.save(&token) {
            warn!(error = %e, "token not persisted; session lasts for this process only");
        }
        self.set_token(Some(token));
        info!(username = %user.username, role = %user.role, "logged in");
        self.state.update(|s| s.sign_in(user));
        true
    }

    /// Forget the token and reset the session. Never fails.
    pub fn logout(&self) {
        self.purge_token();
        self.state.update(|s| {
            s.sign_out();
            s.status_mut().set_error(None);
        });
        self.run_sign_out_hooks();
        info!("logged out");
    }

    /// Create an account. The session identity is left alone.
    pub async fn register(&self, account: &NewAccount) -> bool {
        self.state
            .track(REGISTER_FAILED, async {
                self.api
                    .register(&account.username, &account.email, &account.password)
                    .await?;
                Ok::<_, CoreError>(())
            })
            .await
            .is_ok()
    }

    /// Change username/email and optionally the password.
    ///
    /// The password pair is checked locally first; a mismatch never leaves
    /// the client. On success only `user` is replaced; `is_admin` keeps the
    /// value from sign-in.
    pub async fn update_profile(&self, changes: &ProfileChanges) -> bool {
        let token = match self.require_token() {
            Ok(token) => token,
            Err(e) => {
                self.state.fail(&e, PROFILE_FAILED);
                return false;
            }
        };
        let password = match changes.password_change() {
            Ok(password) => password,
            Err(e) => {
                self.state.fail(&e, PROFILE_FAILED);
                return false;
            }
        };

        let result = self
            .state
            .track(PROFILE_FAILED, async {
                let body = UpdateProfileRequest {
                    username: &changes.username,
                    email: &changes.email,
                    current_password: password.map(|p| p.current.expose_secret()),
                    new_password: password.map(|p| p.new.expose_secret()),
                };
                Ok::<_, CoreError>(User::from(self.api.update_profile(&token, &body).await?))
            })
            .await;

        match result {
            Ok(user) => {
                self.state.update(|s| s.user = Some(user));
                true
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.invalidate_token(&token, Failure::new(&e, PROFILE_FAILED));
                }
                false
            }
        }
    }

    /// Implicit logout after the server rejected the credential.
    pub fn invalidate(&self, reason: Failure) {
        warn!(reason = %reason, "session invalidated");
        self.purge_token();
        self.state.update(|s| {
            s.sign_out();
            s.status_mut().set_error(Some(reason));
        });
        self.run_sign_out_hooks();
    }

    /// Invalidate only if `rejected` is still the live token, so a late 401
    /// for an old credential cannot end a newer session.
    pub(crate) fn invalidate_token(&self, rejected: &AuthToken, reason: Failure) {
        let current = self.token();
        let same = current
            .as_ref()
            .is_some_and(|t| t.secret().expose_secret() == rejected.secret().expose_secret());
        if same {
            self.invalidate(reason);
        } else {
            debug!("ignoring rejection of a superseded token");
        }
    }

    // ── Gating ───────────────────────────────────────────────────────

    pub(crate) fn require_token(&self) -> Result<AuthToken, CoreError> {
        self.token().ok_or_else(CoreError::signed_out)
    }

    pub(crate) fn require_admin(&self) -> Result<AuthToken, CoreError> {
        let token = self.require_token()?;
        if self.is_admin() {
            Ok(token)
        } else {
            Err(CoreError::admin_only())
        }
    }

    // ── Token plumbing ───────────────────────────────────────────────

    fn set_token(&self, token: Option<AuthToken>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn run_sign_out_hooks(&self) {
        let hooks = self.sign_out_hooks.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(hooks = hooks.len(), "dropping user-scoped data");
        for hook in hooks.iter() {
            hook();
        }
    }

    fn purge_token(&self) {
        self.set_token(None);
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "could not remove persisted token");
        }
    }
}
