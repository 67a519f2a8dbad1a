// ── Administrative console manager ──
//
// Roster, inventory, request queue, and statistics views for admins.
// Every call is gated locally on the session (no token, not an admin)
// before anything is sent; the server stays the authority.
//
// Mutations never patch the local lists. They mark the affected views
// stale so the next read re-fetches the server's version.

use std::sync::Arc;

use booknook_api::types::{BookRequest, CreateUserRequest, UpdateUserRequest};
use booknook_api::{AuthToken, LibraryClient};
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use tokio::sync::watch;
use tracing::info;

use crate::browse::{self, RequestFilter};
use crate::convert;
use crate::error::{CoreError, Failure};
use crate::model::{Book, BorrowRequest, RequestStatus, Statistics, User};
use crate::requests::{BookInput, NewUser, UserUpdate};
use crate::session::SessionManager;
use crate::store::{HasStatus, StateCell, Status, Tracked};

const USERS_FAILED: &str = "Failed to fetch users";
const ADD_USER_FAILED: &str = "Failed to add user";
const UPDATE_USER_FAILED: &str = "Failed to update user";
const DELETE_USER_FAILED: &str = "Failed to delete user";
const BOOKS_FAILED: &str = "Failed to fetch books";
const ADD_BOOK_FAILED: &str = "Failed to add book";
const UPDATE_BOOK_FAILED: &str = "Failed to update book";
const DELETE_BOOK_FAILED: &str = "Failed to delete book";
const REQUESTS_FAILED: &str = "Failed to fetch book requests";
const PENDING_FAILED: &str = "Failed to fetch pending requests";
const APPROVE_FAILED: &str = "Failed to approve request";
const REJECT_FAILED: &str = "Failed to reject request";
const RETURN_FAILED: &str = "Failed to process book return";
const STATS_FAILED: &str = "Failed to fetch library statistics";

/// How many pending requests the admin dashboard lists.
pub const ADMIN_DASHBOARD_LIMIT: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub users: Tracked<Vec<User>>,
    pub books: Tracked<Vec<Book>>,
    pub requests: Tracked<Vec<BorrowRequest>>,
    /// Server-filtered to `pending`; fetched separately from `requests`.
    pub pending: Tracked<Vec<BorrowRequest>>,
    pub statistics: Tracked<Option<Statistics>>,
    status: Status,
}

/// What the admin dashboard shows: the statistics snapshot plus the head
/// of each queue.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AdminDashboard {
    pub statistics: Option<Statistics>,
    pub pending: Vec<BorrowRequest>,
    pub pending_total: usize,
    pub due_soon: Vec<BorrowRequest>,
    pub overdue: Vec<BorrowRequest>,
    pub overdue_total: usize,
}

impl AdminState {
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Look a request up in the queue views that still match the server.
    /// A view marked stale by a confirmed transition is skipped.
    fn find_request(&self, id: &str) -> Option<BorrowRequest> {
        [&self.requests, &self.pending]
            .into_iter()
            .filter(|view| view.is_loaded() && !view.is_stale())
            .find_map(|view| view.get().iter().find(|r| r.id == id).cloned())
    }

    /// Drop every admin view.
    fn forget(&mut self) {
        self.users.reset();
        self.books.reset();
        self.requests.reset();
        self.pending.reset();
        self.statistics.reset();
    }

    fn invalidate_queue(&mut self) {
        self.requests.invalidate();
        self.pending.invalidate();
        self.books.invalidate();
        self.statistics.invalidate();
    }
}

impl HasStatus for AdminState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

pub struct AdminConsole {
    api: LibraryClient,
    session: Arc<SessionManager>,
    loan_period_days: u32,
    state: Arc<StateCell<AdminState>>,
}

impl AdminConsole {
    /// Build the console. Its views are dropped whenever `session` signs
    /// out, whichever manager saw the rejected token.
    pub fn new(api: LibraryClient, session: Arc<SessionManager>, loan_period_days: u32) -> Self {
        let state = Arc::new(StateCell::new(AdminState::default()));
        let views = Arc::downgrade(&state);
        session.on_sign_out(move || {
            if let Some(state) = views.upgrade() {
                state.update(AdminState::forget);
            }
        });
        Self {
            api,
            session,
            loan_period_days,
            state,
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub fn state(&self) -> AdminState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.state.subscribe()
    }

    pub fn users(&self) -> Arc<Vec<User>> {
        self.state.read(|s| s.users.get())
    }

    pub fn books(&self) -> Arc<Vec<Book>> {
        self.state.read(|s| s.books.get())
    }

    pub fn requests(&self) -> Arc<Vec<BorrowRequest>> {
        self.state.read(|s| s.requests.get())
    }

    pub fn pending(&self) -> Arc<Vec<BorrowRequest>> {
        self.state.read(|s| s.pending.get())
    }

    pub fn statistics(&self) -> Option<Statistics> {
        self.state.read(|s| (*s.statistics.get()).clone())
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    // ── Local filters ────────────────────────────────────────────────

    pub fn filter_users(&self, term: &str) -> Vec<User> {
        browse::filter_users(&self.users(), term)
    }

    pub fn filter_books(&self, term: &str) -> Vec<Book> {
        browse::search(&self.books(), term)
    }

    pub fn filter_requests(&self, filter: RequestFilter) -> Vec<BorrowRequest> {
        browse::filter_requests(&self.requests(), filter)
    }

    /// Suggested due date for an approval made on `today`.
    pub fn default_due_date(&self, today: NaiveDate) -> NaiveDate {
        browse::default_due_date(today, self.loan_period_days)
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn list_users(&self) -> bool {
        let Some(token) = self.admin_or_fail(USERS_FAILED) else {
            return false;
        };
        let result = self
            .state
            .refresh(USERS_FAILED, |s| &mut s.users, async {
                let users = self.api.list_users(&token).await?;
                Ok::<_, CoreError>(users.into_iter().map(User::from).collect())
            })
            .await;
        self.settle(&token, result, USERS_FAILED).is_some()
    }

    pub async fn add_user(&self, user: &NewUser) -> Option<User> {
        let token = self.admin_or_fail(ADD_USER_FAILED)?;
        let role = user.role.to_string();
        let body = CreateUserRequest {
            username: &user.username,
            email: &user.email,
            password: user.password.expose_secret(),
            role: &role,
        };
        let result = self
            .state
            .track(ADD_USER_FAILED, async {
                Ok::<_, CoreError>(User::from(self.api.create_user(&token, &body).await?))
            })
            .await;

        let created = self.settle(&token, result, ADD_USER_FAILED)?;
        info!(id = %created.id, username = %created.username, "user added");
        self.state.update(|s| {
            s.users.invalidate();
            s.statistics.invalidate();
        });
        Some(created)
    }

    /// Edit a user. A blank password is left out of the request entirely.
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Option<User> {
        let token = self.admin_or_fail(UPDATE_USER_FAILED)?;
        let role = update.role.to_string();
        let body = UpdateUserRequest {
            username: &update.username,
            email: &update.email,
            role: &role,
            password: update.new_password(),
        };
        let result = self
            .state
            .track(UPDATE_USER_FAILED, async {
                Ok::<_, CoreError>(User::from(self.api.update_user(&token, id, &body).await?))
            })
            .await;

        let updated = self.settle(&token, result, UPDATE_USER_FAILED)?;
        info!(id, "user updated");
        self.state.update(|s| s.users.invalidate());
        Some(updated)
    }

    pub async fn delete_user(&self, id: &str) -> bool {
        let Some(token) = self.admin_or_fail(DELETE_USER_FAILED) else {
            return false;
        };
        let result = self
            .state
            .track(DELETE_USER_FAILED, async {
                Ok::<_, CoreError>(self.api.delete_user(&token, id).await?)
            })
            .await;

        if self.settle(&token, result, DELETE_USER_FAILED).is_none() {
            return false;
        }
        info!(id, "user deleted");
        self.state.update(|s| {
            s.users.invalidate();
            s.statistics.invalidate();
        });
        true
    }

    // ── Inventory ────────────────────────────────────────────────────

    pub async fn list_books_admin(&self) -> bool {
        let Some(token) = self.admin_or_fail(BOOKS_FAILED) else {
            return false;
        };
        let result = self
            .state
            .refresh(BOOKS_FAILED, |s| &mut s.books, async {
                Ok::<_, CoreError>(convert::books(self.api.list_books_admin(&token).await?))
            })
            .await;
        self.settle(&token, result, BOOKS_FAILED).is_some()
    }

    /// The inventory, re-fetched first if it was never loaded or a
    /// mutation marked it stale.
    pub async fn books_view(&self) -> Arc<Vec<Book>> {
        if self.state.read(|s| s.books.needs_fetch()) {
            self.list_books_admin().await;
        }
        self.books()
    }

    pub async fn add_book(&self, input: &BookInput) -> Option<Book> {
        let token = self.admin_or_fail(ADD_BOOK_FAILED)?;
        if let Err(e) = input.validate() {
            self.state.fail(&e, ADD_BOOK_FAILED);
            return None;
        }
        let body = book_body(input);
        let result = self
            .state
            .track(ADD_BOOK_FAILED, async {
                Ok::<_, CoreError>(Book::from(self.api.create_book(&token, &body).await?))
            })
            .await;

        let created = self.settle(&token, result, ADD_BOOK_FAILED)?;
        info!(id = %created.id, title = %created.title, "book added");
        self.invalidate_inventory();
        Some(created)
    }

    pub async fn update_book(&self, id: &str, input: &BookInput) -> Option<Book> {
        let token = self.admin_or_fail(UPDATE_BOOK_FAILED)?;
        if let Err(e) = input.validate() {
            self.state.fail(&e, UPDATE_BOOK_FAILED);
            return None;
        }
        let body = book_body(input);
        let result = self
            .state
            .track(UPDATE_BOOK_FAILED, async {
                Ok::<_, CoreError>(Book::from(self.api.update_book(&token, id, &body).await?))
            })
            .await;

        let updated = self.settle(&token, result, UPDATE_BOOK_FAILED)?;
        info!(id, "book updated");
        self.invalidate_inventory();
        Some(updated)
    }

    pub async fn delete_book(&self, id: &str) -> bool {
        let Some(token) = self.admin_or_fail(DELETE_BOOK_FAILED) else {
            return false;
        };
        let result = self
            .state
            .track(DELETE_BOOK_FAILED, async {
                Ok::<_, CoreError>(self.api.delete_book(&token, id).await?)
            })
            .await;

        if self.settle(&token, result, DELETE_BOOK_FAILED).is_none() {
            return false;
        }
        info!(id, "book deleted");
        self.invalidate_inventory();
        true
    }

    // ── Request queue ────────────────────────────────────────────────

    pub async fn list_all_requests(&self) -> bool {
        let Some(token) = self.admin_or_fail(REQUESTS_FAILED) else {
            return false;
        };
        let result = self
            .state
            .refresh(REQUESTS_FAILED, |s| &mut s.requests, async {
                convert::requests(self.api.list_requests(&token).await?)
            })
            .await;
        self.settle(&token, result, REQUESTS_FAILED).is_some()
    }

    pub async fn list_pending_requests(&self) -> bool {
        let Some(token) = self.admin_or_fail(PENDING_FAILED) else {
            return false;
        };
        let result = self
            .state
            .refresh(PENDING_FAILED, |s| &mut s.pending, async {
                convert::requests(self.api.list_pending_requests(&token).await?)
            })
            .await;
        self.settle(&token, result, PENDING_FAILED).is_some()
    }

    /// Approve a pending request with the given due date.
    pub async fn approve_request(&self, id: &str, due_date: NaiveDate) -> Option<BorrowRequest> {
        let token = self.transition_gate(id, RequestStatus::Approved, APPROVE_FAILED)?;
        let result = self
            .state
            .track(APPROVE_FAILED, async {
                BorrowRequest::try_from(self.api.approve_request(&token, id, due_date).await?)
            })
            .await;
        self.finish_transition(&token, result, APPROVE_FAILED)
    }

    pub async fn reject_request(&self, id: &str) -> Option<BorrowRequest> {
        let token = self.transition_gate(id, RequestStatus::Rejected, REJECT_FAILED)?;
        let result = self
            .state
            .track(REJECT_FAILED, async {
                BorrowRequest::try_from(self.api.reject_request(&token, id).await?)
            })
            .await;
        self.finish_transition(&token, result, REJECT_FAILED)
    }

    /// Mark an approved loan as returned.
    pub async fn process_return(&self, id: &str) -> Option<BorrowRequest> {
        let token = self.transition_gate(id, RequestStatus::Returned, RETURN_FAILED)?;
        let result = self
            .state
            .track(RETURN_FAILED, async {
                BorrowRequest::try_from(self.api.process_return(&token, id).await?)
            })
            .await;
        self.finish_transition(&token, result, RETURN_FAILED)
    }

    // ── Statistics ───────────────────────────────────────────────────

    pub async fn get_statistics(&self) -> Option<Statistics> {
        let token = self.admin_or_fail(STATS_FAILED)?;
        let result = self
            .state
            .refresh(STATS_FAILED, |s| &mut s.statistics, async {
                let raw = self.api.statistics(&token).await?;
                Ok::<_, CoreError>(Some(Statistics::try_from(raw)?))
            })
            .await;
        self.settle(&token, result, STATS_FAILED)
            .and_then(|stats| (*stats).clone())
    }

    /// Summarize the last fetched statistics and pending queue.
    pub fn dashboard(&self) -> AdminDashboard {
        let statistics = self.statistics();
        let pending = self.pending();
        let head = |list: &[BorrowRequest]| -> Vec<BorrowRequest> {
            list.iter().take(ADMIN_DASHBOARD_LIMIT).cloned().collect()
        };
        let (due_soon, overdue, overdue_total) = statistics.as_ref().map_or_else(
            || (Vec::new(), Vec::new(), 0),
            |s| (head(&s.books_due_soon), head(&s.overdue_books), s.overdue_books.len()),
        );
        AdminDashboard {
            pending: head(&pending),
            pending_total: pending.len(),
            due_soon,
            overdue,
            overdue_total,
            statistics,
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn admin_or_fail(&self, fallback: &str) -> Option<AuthToken> {
        match self.session.require_admin() {
            Ok(token) => Some(token),
            Err(e) => {
                self.state.fail(&e, fallback);
                None
            }
        }
    }

    /// Gate a workflow transition. A request known from a fresh queue view
    /// in a status that cannot move to `target` is refused without a call;
    /// anything else goes to the server.
    fn transition_gate(
        &self,
        id: &str,
        target: RequestStatus,
        fallback: &str,
    ) -> Option<AuthToken> {
        let token = self.admin_or_fail(fallback)?;
        if let Some(known) = self.state.read(|s| s.find_request(id)) {
            if !known.status.can_transition_to(target) {
                let err = CoreError::invalid(format!(
                    "Request is {} and cannot be {target}",
                    known.status
                ));
                self.state.fail(&err, fallback);
                return None;
            }
        }
        Some(token)
    }

    fn finish_transition(
        &self,
        token: &AuthToken,
        result: Result<BorrowRequest, CoreError>,
        fallback: &str,
    ) -> Option<BorrowRequest> {
        let request = self.settle(token, result, fallback)?;
        info!(id = %request.id, status = %request.status, "request updated");
        self.state.update(AdminState::invalidate_queue);
        Some(request)
    }

    fn invalidate_inventory(&self) {
        self.state.update(|s| {
            s.books.invalidate();
            s.statistics.invalidate();
        });
    }

    fn settle<T>(
        &self,
        token: &AuthToken,
        result: Result<T, CoreError>,
        fallback: &str,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if e.is_unauthorized() {
                    self.session
                        .invalidate_token(token, Failure::new(&e, fallback));
                }
                None
            }
        }
    }
}

fn book_body(input: &BookInput) -> BookRequest<'_> {
    BookRequest {
        title: input.title.trim(),
        author: input.author.trim(),
        year: input.year,
        image_url: input.image_url(),
    }
}
