// ── API-to-domain type conversions ──
//
// Bridges raw `booknook_api::types` responses into `booknook_core::model`
// types. Role strings collapse to `Role`, status strings parse into
// `RequestStatus`; a status the client does not know is a decoding
// failure rather than a guess.

use booknook_api::types::{
    BookResponse, BorrowRequestResponse, PopularBookResponse, StatisticsResponse, UserResponse,
};
use tracing::warn;

use crate::error::CoreError;
use crate::model::{
    Book, BorrowRequest, PopularBook, RequestStatus, Role, Statistics, User, UserRef,
};

// ── Users ──────────────────────────────────────────────────────────

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            role: Role::from_reported(u.role.as_deref()),
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

impl From<booknook_api::types::UserRef> for UserRef {
    fn from(u: booknook_api::types::UserRef) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}

// ── Books ──────────────────────────────────────────────────────────

impl From<BookResponse> for Book {
    fn from(b: BookResponse) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            year: b.year,
            image_url: b.image_url.filter(|url| !url.trim().is_empty()),
            available: b.available,
        }
    }
}

pub(crate) fn books(raw: Vec<BookResponse>) -> Vec<Book> {
    raw.into_iter().map(Book::from).collect()
}

// ── Borrow requests ────────────────────────────────────────────────

impl TryFrom<BorrowRequestResponse> for BorrowRequest {
    type Error = CoreError;

    fn try_from(r: BorrowRequestResponse) -> Result<Self, Self::Error> {
        let status: RequestStatus = r.status.parse().map_err(|_| {
            warn!(id = %r.id, status = %r.status, "unknown request status");
            CoreError::Server {
                status: None,
                message: None,
            }
        })?;

        Ok(Self {
            id: r.id,
            book: r.book.into(),
            user: r.user.into(),
            status,
            request_date: r.request_date,
            due_date: r.due_date,
            approval_date: r.approval_date,
            return_date: r.return_date,
        })
    }
}

pub(crate) fn requests(raw: Vec<BorrowRequestResponse>) -> Result<Vec<BorrowRequest>, CoreError> {
    raw.into_iter().map(BorrowRequest::try_from).collect()
}

// ── Statistics ─────────────────────────────────────────────────────

impl From<PopularBookResponse> for PopularBook {
    fn from(p: PopularBookResponse) -> Self {
        Self {
            id: p.id,
            title: p.title,
            borrow_count: p.borrow_count,
        }
    }
}

impl TryFrom<StatisticsResponse> for Statistics {
    type Error = CoreError;

    fn try_from(s: StatisticsResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            total_books: s.total_books,
            available_books: s.available_books,
            borrowed_books: s.borrowed_books,
            total_users: s.total_users,
            active_borrowers: s.active_borrowers,
            pending_requests: s.pending_requests,
            borrowed_this_month: s.borrowed_this_month,
            returned_this_month: s.returned_this_month,
            overdue_books: requests(s.overdue_books)?,
            books_due_soon: requests(s.books_due_soon)?,
            popular_books: s.popular_books.into_iter().map(PopularBook::from).collect(),
        })
    }
}
