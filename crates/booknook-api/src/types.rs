//! Wire types for the BookNook REST API.
//!
//! Response structs mirror the JSON the server sends (Mongo-style `_id`
//! keys, camelCase fields). Request bodies borrow their strings so callers
//! can build them from secrets without cloning.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn default_available() -> bool {
    true
}

// ── Users ────────────────────────────────────────────────────────────

/// A user record, as returned by `/auth/profile`, `/auth/login`, `/admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// `"admin"` or `"user"`; anything else is treated as a plain user.
    #[serde(default)]
    pub role: Option<String>,
}

/// The borrower reference embedded in a borrow request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserResponse>,
    /// Some server builds report the role beside `user` instead of inside it.
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginResponse {
    /// The server-reported role: `user.role` first, then the top-level field.
    pub fn reported_role(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.role.as_deref())
            .or(self.role.as_deref())
    }
}

/// `GET/PUT /auth/profile` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

// ── Books ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

// ── Borrow requests ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequestResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub book: BookResponse,
    pub user: UserRef,
    /// One of `pending`, `approved`, `rejected`, `returned`.
    pub status: String,
    #[serde(deserialize_with = "crate::dates::required")]
    pub request_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::dates::optional")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::dates::optional")]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::dates::optional")]
    pub return_date: Option<DateTime<Utc>>,
}

// ── Statistics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularBookResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub borrow_count: u64,
}

/// `GET /admin/statistics` response. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsResponse {
    pub total_books: u64,
    pub available_books: u64,
    pub borrowed_books: u64,
    pub total_users: u64,
    pub active_borrowers: u64,
    pub pending_requests: u64,
    pub borrowed_this_month: u64,
    pub returned_this_month: u64,
    pub overdue_books: Vec<BorrowRequestResponse>,
    pub books_due_soon: Vec<BorrowRequestResponse>,
    pub popular_books: Vec<PopularBookResponse>,
}

// ── Request bodies ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowBookRequest<'a> {
    pub book_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateUserRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

/// `PUT /admin/users/:id` body. `password` is left out of the JSON
/// entirely when `None`, so the stored credential is never overwritten.
#[derive(Debug, Serialize)]
pub struct UpdateUserRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

/// Body for both `POST /admin/books` and `PUT /admin/books/:id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest<'a> {
    pub title: &'a str,
    pub author: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
}

/// `PUT /admin/requests/approve/:id` body; the date goes out as `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub due_date: NaiveDate,
}
