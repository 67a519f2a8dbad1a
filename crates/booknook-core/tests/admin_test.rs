#![allow(clippy::unwrap_used)]
// Admin console against a wiremock server: gating, roster, inventory,
// request workflow, and statistics.

use std::sync::Arc;

use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booknook_core::{
    AuthToken, BookInput, ClientConfig, ErrorKind, Library, MemoryTokenStore, RequestFilter,
    RequestStatus, Role, UserUpdate,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn library(server: &MockServer, tokens: Arc<MemoryTokenStore>) -> Library {
    let config = ClientConfig::for_url(&format!("{}/api", server.uri())).unwrap();
    Library::new(config, tokens).unwrap()
}

fn book_json(id: &str, title: &str) -> serde_json::Value {
    json!({ "_id": id, "title": title, "author": "Frank Herbert", "year": 1965, "available": true })
}

fn request_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "book": book_json("b1", "Dune"),
        "user": { "_id": "u2", "username": "grace" },
        "status": status,
        "requestDate": "2025-05-18T10:00:00.000Z"
    })
}

/// Restore a session whose profile reports `role`.
async fn restored(server: &MockServer, role: &str) -> Library {
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "_id": "u1", "username": "ada", "email": "ada@example.com", "role": role }
        })))
        .mount(server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token(AuthToken::new("tok-admin")));
    let lib = library(server, tokens);
    assert!(lib.start().await);
    lib
}

// ── Gating ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_admin_is_refused_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let lib = restored(&server, "user").await;
    assert!(!lib.admin().list_users().await);

    let failure = lib.admin().state().status().error().cloned().unwrap();
    assert_eq!(failure.kind, ErrorKind::Forbidden);
    assert_eq!(failure.message, "Administrator access required");
}

#[tokio::test]
async fn test_signed_out_admin_call_is_unauthorized() {
    let server = MockServer::start().await;
    let lib = library(&server, Arc::new(MemoryTokenStore::new()));

    assert!(lib.admin().get_statistics().await.is_none());
    let failure = lib.admin().state().status().error().cloned().unwrap();
    assert_eq!(failure.kind, ErrorKind::Unauthorized);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_and_filter_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .and(header("x-auth-token", "tok-admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "u1", "username": "ada", "email": "ada@example.com", "role": "admin" },
            { "_id": "u2", "username": "grace", "email": "grace@navy.mil", "role": "user" }
        ])))
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().list_users().await);
    assert_eq!(lib.admin().users().len(), 2);

    let hits = lib.admin().filter_users("NAVY");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].username, "grace");
    assert_eq!(hits[0].role, Role::User);
}

#[tokio::test]
async fn test_update_user_omits_blank_password() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/users/u2"))
        .and(body_json(json!({
            "username": "grace",
            "email": "grace@navy.mil",
            "role": "admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "User updated",
            "user": { "_id": "u2", "username": "grace", "email": "grace@navy.mil", "role": "admin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    let update = UserUpdate {
        username: "grace".into(),
        email: "grace@navy.mil".into(),
        role: Role::Admin,
        password: Some(SecretString::from("   ".to_owned())),
    };
    let updated = lib.admin().update_user("u2", &update).await.unwrap();
    assert_eq!(updated.role, Role::Admin);
    assert!(lib.admin().state().users.is_stale());
}

// ── Inventory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_book_validates_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .respond_with(ResponseTemplate::new(201).set_body_json(book_json("b9", "X")))
        .expect(0)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    let input = BookInput {
        title: "  ".into(),
        author: "Anon".into(),
        ..BookInput::default()
    };
    assert!(lib.admin().add_book(&input).await.is_none());

    let failure = lib.admin().state().status().error().cloned().unwrap();
    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(failure.message, "Title is required");
}

#[tokio::test]
async fn test_books_view_refetches_after_add() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json("b1", "Dune")])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .and(body_json(json!({
            "title": "Children of Dune",
            "author": "Frank Herbert",
            "year": 1976
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Book added",
            "book": book_json("b2", "Children of Dune")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert_eq!(lib.admin().books_view().await.len(), 1);
    // Loaded and fresh: no second fetch.
    assert_eq!(lib.admin().books_view().await.len(), 1);

    let input = BookInput {
        title: " Children of Dune ".into(),
        author: "Frank Herbert".into(),
        year: Some(1976),
        image_url: Some(String::new()),
    };
    let created = lib.admin().add_book(&input).await.unwrap();
    assert_eq!(created.id, "b2");

    lib.admin().books_view().await;
    assert!(!lib.admin().state().books.is_stale());
}

// ── Request workflow ────────────────────────────────────────────────

#[tokio::test]
async fn test_approve_sends_due_date_and_marks_queue_stale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            request_json("r1", "pending"),
            request_json("r2", "approved"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/approve/r1"))
        .and(body_json(json!({ "dueDate": "2025-06-01" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Request approved",
            "request": request_json("r1", "approved")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().list_all_requests().await);
    assert_eq!(
        lib.admin()
            .filter_requests(RequestFilter::Only(RequestStatus::Pending))
            .len(),
        1
    );

    let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let approved = lib.admin().approve_request("r1", due).await.unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);

    let state = lib.admin().state();
    assert!(state.requests.is_stale());
    assert!(state.pending.is_stale());
    assert!(state.statistics.is_stale());
}

#[tokio::test]
async fn test_return_after_approve_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            request_json("r1", "pending"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/approve/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Request approved",
            "request": request_json("r1", "approved")
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/return/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Book returned",
            "request": request_json("r1", "returned")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().list_all_requests().await);
    let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    assert!(lib.admin().approve_request("r1", due).await.is_some());

    // The queue still lists r1 as pending, but it is stale now.
    let returned = lib.admin().process_return("r1").await.unwrap();
    assert_eq!(returned.status, RequestStatus::Returned);
    assert!(lib.admin().state().status().error().is_none());
}

#[tokio::test]
async fn test_return_of_pending_request_is_refused_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            request_json("r1", "pending"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/return/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_json("r1", "returned")))
        .expect(0)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().list_pending_requests().await);
    assert!(lib.admin().process_return("r1").await.is_none());

    let failure = lib.admin().state().status().error().cloned().unwrap();
    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(failure.message, "Request is pending and cannot be returned");
}

#[tokio::test]
async fn test_reject_unknown_request_defers_to_server() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/reject/r9"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Request is not pending" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().reject_request("r9").await.is_none());
    assert_eq!(
        lib.admin().state().status().error().unwrap().message,
        "Request is not pending"
    );
}

#[test]
fn test_default_due_date_is_two_weeks_out() {
    let config = ClientConfig::for_url("http://localhost:5000/api").unwrap();
    let lib = Library::new(config, Arc::new(MemoryTokenStore::new())).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 5, 18).unwrap();
    assert_eq!(
        lib.admin().default_due_date(today),
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    );
}

// ── Statistics ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_statistics_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalBooks": 120,
            "availableBooks": 95,
            "borrowedBooks": 25,
            "totalUsers": 40,
            "activeBorrowers": 18,
            "pendingRequests": 3,
            "borrowedThisMonth": 12,
            "returnedThisMonth": 9,
            "overdueBooks": [request_json("r2", "approved")],
            "booksDueSoon": [],
            "popularBooks": [{ "_id": "b1", "title": "Dune", "borrowCount": 14 }]
        })))
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    let stats = lib.admin().get_statistics().await.unwrap();

    assert_eq!(stats.total_books, 120);
    assert_eq!(stats.pending_requests, 3);
    assert_eq!(stats.overdue_books.len(), 1);
    assert_eq!(stats.popular_books[0].borrow_count, 14);
    assert_eq!(lib.admin().statistics(), Some(stats));
}

#[tokio::test]
async fn test_dashboard_lists_head_of_each_queue() {
    let server = MockServer::start().await;
    let pending: Vec<_> = (1..=7).map(|i| request_json(&format!("p{i}"), "pending")).collect();
    Mock::given(method("GET"))
        .and(path("/api/admin/requests/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(pending)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalBooks": 3,
            "overdueBooks": [request_json("o1", "approved")]
        })))
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().dashboard().statistics.is_none());

    assert!(lib.admin().list_pending_requests().await);
    assert!(lib.admin().get_statistics().await.is_some());

    let dashboard = lib.admin().dashboard();
    assert_eq!(dashboard.pending.len(), 5);
    assert_eq!(dashboard.pending_total, 7);
    assert_eq!(dashboard.overdue_total, 1);
    assert!(dashboard.due_soon.is_empty());
    assert_eq!(dashboard.statistics.unwrap().total_books, 3);
}

// ── Session loss ────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_token_drops_every_user_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "u2", "username": "grace", "email": "grace@navy.mil", "role": "user" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/user/borrowed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            request_json("r2", "approved"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/statistics"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token is not valid" })),
        )
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().list_users().await);
    assert!(lib.catalog().list_my_borrowed().await);
    assert_eq!(lib.admin().users().len(), 1);

    assert!(lib.admin().get_statistics().await.is_none());

    assert!(!lib.session().is_authenticated());
    assert!(lib.admin().users().is_empty());
    assert!(!lib.admin().state().users.is_loaded());
    assert!(lib.catalog().my_borrowed().is_empty());
    assert_eq!(
        lib.admin().state().status().error().unwrap().kind,
        ErrorKind::Unauthorized
    );
}

#[tokio::test]
async fn test_logout_drops_admin_views() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            request_json("r1", "pending"),
        ])))
        .mount(&server)
        .await;

    let lib = restored(&server, "admin").await;
    assert!(lib.admin().list_all_requests().await);
    assert_eq!(lib.admin().requests().len(), 1);

    lib.logout();

    assert!(lib.admin().requests().is_empty());
    assert!(lib.admin().state().status().error().is_none());
}
