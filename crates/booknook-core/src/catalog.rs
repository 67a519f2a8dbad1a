// ── Catalog & borrowing manager ──
//
// Owns the public catalog, the open book detail, and the signed-in
// user's requests and loans. Search, pagination, and the featured preview
// are computed locally over the last fetched catalog.

use std::sync::Arc;

use booknook_api::{AuthToken, LibraryClient};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::browse::{self, Page};
use crate::convert;
use crate::error::{CoreError, Failure};
use crate::model::{Book, BorrowRequest, RequestStatus};
use crate::session::SessionManager;
use crate::store::{HasStatus, StateCell, Status, Tracked};

const BOOKS_FAILED: &str = "Failed to fetch books";
const BOOK_FAILED: &str = "Failed to fetch book details";
const REQUEST_FAILED: &str = "Failed to request book";
const MY_REQUESTS_FAILED: &str = "Failed to fetch user requests";
const MY_BORROWED_FAILED: &str = "Failed to fetch borrowed books";

/// How many borrowed and pending items the user dashboard lists.
pub const DASHBOARD_LIMIT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub books: Tracked<Vec<Book>>,
    /// The book most recently opened with `get_book`.
    pub detail: Tracked<Option<Book>>,
    pub my_requests: Tracked<Vec<BorrowRequest>>,
    pub my_borrowed: Tracked<Vec<BorrowRequest>>,
    status: Status,
}

impl CatalogState {
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Drop everything tied to the signed-in user. The public catalog stays.
    fn forget_user(&mut self) {
        self.my_requests.reset();
        self.my_borrowed.reset();
    }
}

impl HasStatus for CatalogState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// What the user dashboard shows: the first few loans and pending requests
/// plus the totals behind them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DashboardSummary {
    pub borrowed: Vec<BorrowRequest>,
    pub borrowed_total: usize,
    pub pending: Vec<BorrowRequest>,
    pub pending_total: usize,
}

pub struct CatalogClient {
    api: LibraryClient,
    session: Arc<SessionManager>,
    page_size: usize,
    preview_size: usize,
    state: Arc<StateCell<CatalogState>>,
}

impl CatalogClient {
    pub fn new(
        api: LibraryClient,
        session: Arc<SessionManager>,
        page_size: usize,
        preview_size: usize,
    ) -> Self {
        let state = Arc::new(StateCell::new(CatalogState::default()));
        let views = Arc::downgrade(&state);
        session.on_sign_out(move || {
            if let Some(state) = views.upgrade() {
                debug!("clearing user collections");
                state.update(CatalogState::forget_user);
            }
        });
        Self {
            api,
            session,
            page_size,
            preview_size,
            state,
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub fn state(&self) -> CatalogState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn books(&self) -> Arc<Vec<Book>> {
        self.state.read(|s| s.books.get())
    }

    pub fn book(&self) -> Option<Book> {
        self.state.read(|s| (*s.detail.get()).clone())
    }

    pub fn my_requests(&self) -> Arc<Vec<BorrowRequest>> {
        self.state.read(|s| s.my_requests.get())
    }

    pub fn my_borrowed(&self) -> Arc<Vec<BorrowRequest>> {
        self.state.read(|s| s.my_borrowed.get())
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    // ── Catalog ──────────────────────────────────────────────────────

    /// Replace the catalog with the server's.
    pub async fn list_books(&self) -> bool {
        self.state
            .refresh(BOOKS_FAILED, |s| &mut s.books, async {
                Ok::<_, CoreError>(convert::books(self.api.list_books().await?))
            })
            .await
            .is_ok()
    }

    /// Fetch one book into the detail slot. A missing book clears the slot.
    pub async fn get_book(&self, id: &str) -> Option<Book> {
        let result = self
            .state
            .refresh(BOOK_FAILED, |s| &mut s.detail, async {
                Ok::<_, CoreError>(Some(Book::from(self.api.get_book(id).await?)))
            })
            .await;

        match result {
            Ok(book) => (*book).clone(),
            Err(_) => {
                self.state.update(|s| s.detail.reset());
                None
            }
        }
    }

    /// Books matching `term` in title or author, ignoring case.
    pub fn search(&self, term: &str) -> Vec<Book> {
        browse::search(&self.books(), term)
    }

    /// Page `number` (1-based) of the books matching `term`.
    pub fn page(&self, term: &str, number: usize) -> Page<Book> {
        browse::paginate(&self.search(term), number, self.page_size)
    }

    /// Random preview for visitors, stable for a given seed.
    pub fn featured(&self, seed: u64) -> Vec<Book> {
        browse::sample(&self.books(), self.preview_size, seed)
    }

    // ── Borrowing ────────────────────────────────────────────────────

    /// Ask to borrow a book.
    ///
    /// Availability is never flipped locally: the catalog, the detail, and
    /// the user's requests are marked stale and pick up the server's view
    /// on the next fetch.
    pub async fn request_borrow(&self, book_id: &str) -> Option<BorrowRequest> {
        let token = self.token_or_fail(REQUEST_FAILED)?;

        let result = self
            .state
            .track(REQUEST_FAILED, async {
                BorrowRequest::try_from(self.api.request_book(&token, book_id).await?)
            })
            .await;

        let request = self.settle(&token, result, REQUEST_FAILED)?;
        info!(book_id, request_id = %request.id, "borrow requested");
        self.state.update(|s| {
            s.books.invalidate();
            s.detail.invalidate();
            s.my_requests.invalidate();
        });
        Some(request)
    }

    pub async fn list_my_requests(&self) -> bool {
        let Some(token) = self.token_or_fail(MY_REQUESTS_FAILED) else {
            return false;
        };
        let result = self
            .state
            .refresh(MY_REQUESTS_FAILED, |s| &mut s.my_requests, async {
                convert::requests(self.api.my_requests(&token).await?)
            })
            .await;
        self.settle(&token, result, MY_REQUESTS_FAILED).is_some()
    }

    pub async fn list_my_borrowed(&self) -> bool {
        let Some(token) = self.token_or_fail(MY_BORROWED_FAILED) else {
            return false;
        };
        let result = self
            .state
            .refresh(MY_BORROWED_FAILED, |s| &mut s.my_borrowed, async {
                convert::requests(self.api.my_borrowed(&token).await?)
            })
            .await;
        self.settle(&token, result, MY_BORROWED_FAILED).is_some()
    }

    /// The user's requests still awaiting a decision.
    pub fn pending_requests(&self) -> Vec<BorrowRequest> {
        self.my_requests()
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned()
            .collect()
    }

    pub fn dashboard(&self) -> DashboardSummary {
        let borrowed = self.my_borrowed();
        let pending = self.pending_requests();
        DashboardSummary {
            borrowed_total: borrowed.len(),
            borrowed: borrowed.iter().take(DASHBOARD_LIMIT).cloned().collect(),
            pending_total: pending.len(),
            pending: pending.into_iter().take(DASHBOARD_LIMIT).collect(),
        }
    }

    /// Re-fetch whatever a confirmed mutation marked stale.
    pub async fn refresh_stale(&self) -> bool {
        let (books, requests) = self
            .state
            .read(|s| (s.books.is_stale(), s.my_requests.is_stale()));

        let mut ok = true;
        if books {
            ok &= self.list_books().await;
        }
        if requests && self.session.token().is_some() {
            ok &= self.list_my_requests().await;
        }
        ok
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn token_or_fail(&self, fallback: &str) -> Option<AuthToken> {
        match self.session.require_token() {
            Ok(token) => Some(token),
            Err(e) => {
                self.state.fail(&e, fallback);
                None
            }
        }
    }

    /// Turn a finished call into its value, ending the session when the
    /// server rejected the token.
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
