// Catalog and borrowing endpoints.

use tracing::debug;

use crate::auth::AuthToken;
use crate::client::{LibraryClient, unwrap_entity};
use crate::error::Error;
use crate::types::{BookResponse, BorrowBookRequest, BorrowRequestResponse};

impl LibraryClient {
    /// `GET /books` (public)
    pub async fn list_books(&self) -> Result<Vec<BookResponse>, Error> {
        self.get(self.url(&["books"]), None).await
    }

    /// `GET /books/:id` (public)
    pub async fn get_book(&self, id: &str) -> Result<BookResponse, Error> {
        self.get(self.url(&["books", id]), None).await
    }

    /// Ask to borrow a book. The new request starts out `pending`.
    ///
    /// `POST /books/request` with `{"bookId": "..."}`
    pub async fn request_book(
        &self,
        token: &AuthToken,
        book_id: &str,
    ) -> Result<BorrowRequestResponse, Error> {
        debug!(book_id, "requesting book");
        let value: serde_json::Value = self
            .post(
                self.url(&["books", "request"]),
                &BorrowBookRequest { book_id },
                Some(token),
            )
            .await?;
        unwrap_entity(value, "request")
    }

    /// The caller's own borrow requests, every status.
    ///
    /// `GET /books/user/requests`
    pub async fn my_requests(&self, token: &AuthToken) -> Result<Vec<BorrowRequestResponse>, Error> {
        self.get(self.url(&["books", "user", "requests"]), Some(token))
            .await
    }

    /// The caller's approved, not yet returned requests.
    ///
    /// `GET /books/user/borrowed`
    pub async fn my_borrowed(&self, token: &AuthToken) -> Result<Vec<BorrowRequestResponse>, Error> {
        self.get(self.url(&["books", "user", "borrowed"]), Some(token))
            .await
    }
}
