#![allow(clippy::unwrap_used)]
// Integration tests for `LibraryClient` using wiremock.

use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use booknook_api::types::{BookRequest, UpdateUserRequest};
use booknook_api::{AuthToken, Error, LibraryClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LibraryClient) {
    let server = MockServer::start().await;
    let client =
        LibraryClient::from_reqwest(&format!("{}/api", server.uri()), reqwest::Client::new())
            .unwrap();
    (server, client)
}

fn token() -> AuthToken {
    AuthToken::new("tok-123")
}

fn book_json(id: &str, title: &str, author: &str) -> serde_json::Value {
    json!({ "_id": id, "title": title, "author": author, "year": 1965, "available": true })
}

fn request_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "book": book_json("b1", "Dune", "Frank Herbert"),
        "user": { "_id": "u1", "username": "ada" },
        "status": status,
        "requestDate": "2025-05-18T10:00:00.000Z"
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-abc",
            "user": { "_id": "u1", "username": "ada", "email": "ada@example.com", "role": "admin" }
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("pw".to_string());
    let resp = client.login("ada@example.com", &password).await.unwrap();

    assert_eq!(resp.token, "tok-abc");
    assert_eq!(resp.reported_role(), Some("admin"));
    assert_eq!(resp.user.unwrap().username, "ada");
}

#[tokio::test]
async fn test_login_failure_keeps_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("nope".to_string());
    let err = client.login("ada@example.com", &password).await.unwrap_err();

    assert!(matches!(err, Error::Validation { status: 400, .. }), "got {err:?}");
    assert_eq!(err.server_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_profile_sends_token_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("x-auth-token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "_id": "u1", "username": "ada", "email": "ada@example.com", "role": "user" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client.get_profile(&token()).await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.role.as_deref(), Some("user"));
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token is not valid" })),
        )
        .mount(&server)
        .await;

    let err = client.get_profile(&token()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Token is not valid"));
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_books_is_public() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            book_json("b1", "Dune", "Frank Herbert"),
            book_json("b2", "Foundation", "Isaac Asimov"),
        ])))
        .mount(&server)
        .await;

    let books = client.list_books().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[1].title, "Foundation");

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("x-auth-token").is_none());
}

#[tokio::test]
async fn test_get_book_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Book not found" })))
        .mount(&server)
        .await;

    let err = client.get_book("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Book not found"));
}

#[tokio::test]
async fn test_request_book_posts_book_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/books/request"))
        .and(header("x-auth-token", "tok-123"))
        .and(body_json(json!({ "bookId": "b1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Book request submitted",
            "request": request_json("r1", "pending")
        })))
        .mount(&server)
        .await;

    let req = client.request_book(&token(), "b1").await.unwrap();
    assert_eq!(req.id, "r1");
    assert_eq!(req.status, "pending");
}

// ── Admin ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_user_without_password_omits_field() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/users/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u2", "username": "bob", "email": "bob@example.com", "role": "user"
        })))
        .mount(&server)
        .await;

    let body = UpdateUserRequest {
        username: "bob",
        email: "bob@example.com",
        role: "user",
        password: None,
    };
    client.update_user(&token(), "u2", &body).await.unwrap();

    let received: Vec<Request> = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(sent.get("password").is_none(), "password leaked into {sent}");
    assert_eq!(sent["username"], "bob");
}

#[tokio::test]
async fn test_approve_request_sends_due_date() {
    let (server, client) = setup().await;

    let mut approved = request_json("r1", "approved");
    approved["dueDate"] = json!("2025-06-01");

    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/approve/r1"))
        .and(body_json(json!({ "dueDate": "2025-06-01" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&approved))
        .mount(&server)
        .await;

    let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let req = client.approve_request(&token(), "r1", due).await.unwrap();

    assert_eq!(req.status, "approved");
    assert_eq!(req.due_date.unwrap().date_naive(), due);
}

#[tokio::test]
async fn test_create_book_and_delete() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .and(body_json(json!({ "title": "1984", "author": "George Orwell", "year": 1949 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Book added",
            "book": book_json("b3", "1984", "George Orwell")
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/books/b3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Book removed" })))
        .mount(&server)
        .await;

    let body = BookRequest {
        title: "1984",
        author: "George Orwell",
        year: Some(1949),
        image_url: None,
    };
    let book = client.create_book(&token(), &body).await.unwrap();
    assert_eq!(book.id, "b3");

    client.delete_book(&token(), "b3").await.unwrap();
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Admin only" })))
        .mount(&server)
        .await;

    let err = client.statistics(&token()).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn test_statistics_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalBooks": 3,
            "availableBooks": 2,
            "borrowedBooks": 1,
            "overdueBooks": [request_json("r9", "approved")],
            "popularBooks": [{ "_id": "b1", "title": "Dune", "borrowCount": 7 }]
        })))
        .mount(&server)
        .await;

    let stats = client.statistics(&token()).await.unwrap();
    assert_eq!(stats.total_books, 3);
    assert_eq!(stats.overdue_books.len(), 1);
    assert_eq!(stats.popular_books[0].borrow_count, 7);
}

#[tokio::test]
async fn test_server_error_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list_books().await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 500, message: None }));
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list_books().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}
