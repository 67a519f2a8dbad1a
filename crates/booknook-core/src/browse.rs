//! Pure helpers behind the list views: search, pagination, preview
//! sampling, roster filters, and due-date arithmetic.
//!
//! Nothing here touches the network or manager state, so every view can
//! recompute its slice synchronously from the latest snapshot.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::model::{Book, BorrowRequest, RequestStatus, User};

// ── Search & pagination ──────────────────────────────────────────────

/// Books whose title or author contains `term`, ignoring case. The term
/// is matched as given, surrounding whitespace included.
pub fn search(books: &[Book], term: &str) -> Vec<Book> {
    books.iter().filter(|b| b.matches(term)).cloned().collect()
}

/// One 1-based page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page that was asked for.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// Slice `[(number-1)*size, number*size)` clipped to the list.
/// Page 0 and pages past the end come back empty.
pub fn paginate<T: Clone>(items: &[T], number: usize, size: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = if size == 0 {
        0
    } else {
        total_items.div_ceil(size)
    };

    let slice = match number.checked_sub(1).and_then(|i| i.checked_mul(size)) {
        Some(start) if number <= total_pages => {
            let end = (start + size).min(total_items);
            items.get(start..end).unwrap_or_default().to_vec()
        }
        _ => Vec::new(),
    };

    Page {
        items: slice,
        number,
        total_pages,
        total_items,
    }
}

// ── Preview sampling ─────────────────────────────────────────────────

/// Up to `cap` distinct books picked at random. The same `seed` over the
/// same catalog yields the same picks.
pub fn sample(books: &[Book], cap: usize, seed: u64) -> Vec<Book> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    books.choose_multiple(&mut rng, cap).cloned().collect()
}

// ── Roster filters ───────────────────────────────────────────────────

pub fn filter_users(users: &[User], term: &str) -> Vec<User> {
    users
        .iter()
        .filter(|u| term.is_empty() || u.matches(term))
        .cloned()
        .collect()
}

/// Status filter of the request queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestFilter {
    #[default]
    All,
    Only(RequestStatus),
}

impl RequestFilter {
    pub fn admits(self, request: &BorrowRequest) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => request.status == status,
        }
    }
}

impl FromStr for RequestFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl fmt::Display for RequestFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

pub fn filter_requests(requests: &[BorrowRequest], filter: RequestFilter) -> Vec<BorrowRequest> {
    requests
        .iter()
        .filter(|r| filter.admits(r))
        .cloned()
        .collect()
}

// ── Dates ────────────────────────────────────────────────────────────

/// Suggested due date for an approval: `today` plus the loan period.
pub fn default_due_date(today: NaiveDate, loan_period_days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(loan_period_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days `due` lies behind `today`; zero if not yet due.
pub fn days_overdue(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days().max(0)
}
