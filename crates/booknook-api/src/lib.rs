// booknook-api: Async Rust client for the BookNook library REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

mod account;
mod admin;
mod books;
mod dates;

pub use auth::{AuthToken, TOKEN_HEADER};
pub use client::LibraryClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
