// ── Library statistics snapshot ──

use serde::{Deserialize, Serialize};

use super::request::BorrowRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularBook {
    pub id: String,
    pub title: String,
    pub borrow_count: u64,
}

/// Point-in-time aggregate. Replaced whole on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_books: u64,
    pub available_books: u64,
    pub borrowed_books: u64,
    pub total_users: u64,
    pub active_borrowers: u64,
    pub pending_requests: u64,
    pub borrowed_this_month: u64,
    pub returned_this_month: u64,
    pub overdue_books: Vec<BorrowRequest>,
    pub books_due_soon: Vec<BorrowRequest>,
    pub popular_books: Vec<PopularBook>,
}
