// booknook-core: Session, catalog, and admin state between booknook-api and front ends.

pub mod access;
pub mod admin;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod library;
pub mod model;
pub mod requests;
pub mod session;
pub mod store;
pub mod token;

// ── Primary re-exports ──────────────────────────────────────────────
pub use access::{Access, Requirement, View};
pub use admin::{AdminConsole, AdminDashboard, AdminState};
pub use browse::{Page, RequestFilter};
pub use catalog::{CatalogClient, CatalogState, DashboardSummary};
pub use config::ClientConfig;
pub use error::{CoreError, ErrorKind, Failure};
pub use library::Library;
pub use requests::{BookInput, Credentials, NewAccount, NewUser, PasswordChange, ProfileChanges, UserUpdate};
pub use session::{Session, SessionManager};
pub use store::{Status, Tracked};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};

// Re-export model types at the crate root for ergonomics.
pub use model::{Book, BorrowRequest, PopularBook, RequestStatus, Role, Statistics, User, UserRef};

// The token type crosses the crate boundary through `TokenStore`.
pub use booknook_api::{AuthToken, TlsMode};
