// Administrator endpoints: user roster, inventory, request queue, statistics.
//
// All of these need an admin token; the server answers 403 otherwise.

use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use crate::auth::AuthToken;
use crate::client::{LibraryClient, unwrap_entity};
use crate::error::Error;
use crate::types::{
    ApproveRequest, BookRequest, BookResponse, BorrowRequestResponse, CreateUserRequest,
    StatisticsResponse, UpdateUserRequest, UserResponse,
};

impl LibraryClient {
    // ── Users ────────────────────────────────────────────────────────

    /// `GET /admin/users`
    pub async fn list_users(&self, token: &AuthToken) -> Result<Vec<UserResponse>, Error> {
        self.get(self.url(&["admin", "users"]), Some(token)).await
    }

    /// `POST /admin/users`
    pub async fn create_user(
        &self,
        token: &AuthToken,
        body: &CreateUserRequest<'_>,
    ) -> Result<UserResponse, Error> {
        debug!(username = body.username, role = body.role, "creating user");
        let value: serde_json::Value = self
            .post(self.url(&["admin", "users"]), body, Some(token))
            .await?;
        unwrap_entity(value, "user")
    }

    /// `PUT /admin/users/:id`
    pub async fn update_user(
        &self,
        token: &AuthToken,
        id: &str,
        body: &UpdateUserRequest<'_>,
    ) -> Result<UserResponse, Error> {
        debug!(id, password_change = body.password.is_some(), "updating user");
        let value: serde_json::Value = self
            .put(self.url(&["admin", "users", id]), body, Some(token))
            .await?;
        unwrap_entity(value, "user")
    }

    /// `DELETE /admin/users/:id`
    pub async fn delete_user(&self, token: &AuthToken, id: &str) -> Result<(), Error> {
        debug!(id, "deleting user");
        self.delete(self.url(&["admin", "users", id]), Some(token))
            .await
    }

    // ── Inventory ────────────────────────────────────────────────────

    /// `GET /admin/books`
    pub async fn list_books_admin(&self, token: &AuthToken) -> Result<Vec<BookResponse>, Error> {
        self.get(self.url(&["admin", "books"]), Some(token)).await
    }

    /// `POST /admin/books`
    pub async fn create_book(
        &self,
        token: &AuthToken,
        body: &BookRequest<'_>,
    ) -> Result<BookResponse, Error> {
        debug!(title = body.title, "creating book");
        let value: serde_json::Value = self
            .post(self.url(&["admin", "books"]), body, Some(token))
            .await?;
        unwrap_entity(value, "book")
    }

    /// `PUT /admin/books/:id`
    pub async fn update_book(
        &self,
        token: &AuthToken,
        id: &str,
        body: &BookRequest<'_>,
    ) -> Result<BookResponse, Error> {
        debug!(id, "updating book");
        let value: serde_json::Value = self
            .put(self.url(&["admin", "books", id]), body, Some(token))
            .await?;
        unwrap_entity(value, "book")
    }

    /// `DELETE /admin/books/:id`
    pub async fn delete_book(&self, token: &AuthToken, id: &str) -> Result<(), Error> {
        debug!(id, "deleting book");
        self.delete(self.url(&["admin", "books", id]), Some(token))
            .await
    }

    // ── Request queue ────────────────────────────────────────────────

    /// `GET /admin/requests`
    pub async fn list_requests(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<BorrowRequestResponse>, Error> {
        self.get(self.url(&["admin", "requests"]), Some(token)).await
    }

    /// Server-filtered view of requests still awaiting a decision.
    ///
    /// `GET /admin/requests/pending`
    pub async fn list_pending_requests(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<BorrowRequestResponse>, Error> {
        self.get(self.url(&["admin", "requests", "pending"]), Some(token))
            .await
    }

    /// `PUT /admin/requests/approve/:id` with `{"dueDate": "YYYY-MM-DD"}`
    pub async fn approve_request(
        &self,
        token: &AuthToken,
        id: &str,
        due_date: NaiveDate,
    ) -> Result<BorrowRequestResponse, Error> {
        debug!(id, %due_date, "approving request");
        let value: serde_json::Value = self
            .put(
                self.url(&["admin", "requests", "approve", id]),
                &ApproveRequest { due_date },
                Some(token),
            )
            .await?;
        unwrap_entity(value, "request")
    }

    /// `PUT /admin/requests/reject/:id`
    pub async fn reject_request(
        &self,
        token: &AuthToken,
        id: &str,
    ) -> Result<BorrowRequestResponse, Error> {
        debug!(id, "rejecting request");
        let value: serde_json::Value = self
            .put(
                self.url(&["admin", "requests", "reject", id]),
                &json!({}),
                Some(token),
            )
            .await?;
        unwrap_entity(value, "request")
    }

    /// `PUT /admin/requests/return/:id`
    pub async fn process_return(
        &self,
        token: &AuthToken,
        id: &str,
    ) -> Result<BorrowRequestResponse, Error> {
        debug!(id, "processing return");
        let value: serde_json::Value = self
            .put(
                self.url(&["admin", "requests", "return", id]),
                &json!({}),
                Some(token),
            )
            .await?;
        unwrap_entity(value, "request")
    }

    // ── Statistics ───────────────────────────────────────────────────

    /// `GET /admin/statistics`
    pub async fn statistics(&self, token: &AuthToken) -> Result<StatisticsResponse, Error> {
        self.get(self.url(&["admin", "statistics"]), Some(token))
            .await
    }
}
