// ── Borrow request domain types ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::book::Book;
use super::user::UserRef;

/// Lifecycle of a borrow request.
///
/// Forward-only: `Pending -> Approved -> Returned`, or `Pending -> Rejected`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl RequestStatus {
    /// Whether the server could move a request from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected) | (Self::Approved, Self::Returned)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Returned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRequest {
    pub id: String,
    pub book: Book,
    pub user: UserRef,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub approval_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRequest {
    /// Whole days past the due date as of `today`; zero when not overdue.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        self.due_date
            .map_or(0, |due| crate::browse::days_overdue(due.date_naive(), today))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn transitions_are_forward_only() {
        use RequestStatus::{Approved, Pending, Rejected, Returned};
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Returned));

        assert!(!Pending.can_transition_to(Returned));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Pending));
        for next in RequestStatus::iter() {
            assert!(!Rejected.can_transition_to(next));
            assert!(!Returned.can_transition_to(next));
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in RequestStatus::iter() {
            let parsed: RequestStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("lost".parse::<RequestStatus>().is_err());
    }
}
