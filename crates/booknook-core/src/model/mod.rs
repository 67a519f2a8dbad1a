// ── Domain model ──
//
// Canonical client-side representations of library entities. Built from
// the wire types in `booknook_api::types` by `crate::convert`.

pub mod book;
pub mod request;
pub mod stats;
pub mod user;

pub use book::Book;
pub use request::{BorrowRequest, RequestStatus};
pub use stats::{PopularBook, Statistics};
pub use user::{Role, User, UserRef};
