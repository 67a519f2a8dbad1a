//! Integration tests for the `booknook` CLI binary.
//!
//! Argument parsing, help, and completions run without a service; the
//! rest point `--api-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `booknook` binary with env isolation.
///
/// Clears all `BOOKNOOK_*` env vars and points config and data
/// directories into `home` so tests never touch real configuration.
fn booknook_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("booknook");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("RUST_LOG")
        .env_remove("BOOKNOOK_PROFILE")
        .env_remove("BOOKNOOK_API_URL")
        .env_remove("BOOKNOOK_TOKEN_STORE")
        .env_remove("BOOKNOOK_TOKEN_FILE")
        .env_remove("BOOKNOOK_OUTPUT")
        .env_remove("BOOKNOOK_INSECURE")
        .env_remove("BOOKNOOK_TIMEOUT")
        .arg("--color")
        .arg("never");
    cmd
}

/// Same as [`booknook_cmd`], wired to a mock server and a token file.
fn against(server: &MockServer, home: &Path) -> assert_cmd::Command {
    let mut cmd = booknook_cmd(home);
    cmd.arg("--api-url")
        .arg(format!("{}/api", server.uri()))
        .arg("--token-store")
        .arg("file")
        .arg("--token-file")
        .arg(home.join("token"));
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn user_json(role: &str) -> serde_json::Value {
    json!({ "_id": "u1", "username": "ada", "email": "ada@example.com", "role": role })
}

async fn mount_profile(server: &MockServer, token: &str, role: &str) {
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("x-auth-token", token))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(role) })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = booknook_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("BookNook")
            .and(predicate::str::contains("books"))
            .and(predicate::str::contains("admin"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("booknook"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .arg("shelve")
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Local gating ────────────────────────────────────────────────────

#[test]
fn test_dashboard_requires_login() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .args(["--token-store", "memory", "me", "dashboard"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("You must be logged in"));
}

#[test]
fn test_admin_stats_requires_login() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .args(["--token-store", "memory", "admin", "stats"])
        .assert()
        .code(3);
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .args(["--profile", "campus", "books", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("campus"));
}

#[test]
fn test_unreachable_service_exits_with_connection_code() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let home = tempfile::tempdir().unwrap();
    booknook_cmd(home.path())
        .args(["--token-store", "memory", "--timeout", "5"])
        .arg("--api-url")
        .arg(format!("http://127.0.0.1:{port}/api"))
        .args(["books", "list"])
        .assert()
        .code(7);
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_books_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b1", "title": "Dune", "author": "Frank Herbert", "year": 1965, "available": true },
            { "_id": "b2", "title": "Foundation", "author": "Isaac Asimov", "available": false }
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = against(&server, home.path())
        .args(["-o", "json", "books", "search", "dune"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let books: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Dune");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": user_json("user")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    against(&server, home.path())
        .args(["login", "--email", "ada@example.com", "--password-stdin"])
        .write_stdin("hunter2\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed in as ada"));

    let saved = std::fs::read_to_string(home.path().join("token")).unwrap();
    assert_eq!(saved.trim(), "tok-1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bad_credentials_exit_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    against(&server, home.path())
        .args(["login", "--email", "ada@example.com", "--password-stdin"])
        .write_stdin("wrong\n")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid credentials"));
    assert!(!home.path().join("token").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_whoami_restores_stored_session() {
    let server = MockServer::start().await;
    mount_profile(&server, "tok-9", "admin").await;

    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("token"), "tok-9").unwrap();

    let output = against(&server, home.path())
        .args(["-o", "json", "whoami"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let user: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(user["username"], "ada");
    assert_eq!(user["role"], "admin");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_members_cannot_open_admin_commands() {
    let server = MockServer::start().await;
    mount_profile(&server, "tok-7", "user").await;
    Mock::given(method("GET"))
        .and(path("/api/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("token"), "tok-7").unwrap();

    against(&server, home.path())
        .args(["admin", "stats"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Administrator access required"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_logout_removes_token_file() {
    let server = MockServer::start().await;
    mount_profile(&server, "tok-3", "user").await;

    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("token"), "tok-3").unwrap();

    against(&server, home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed out"));
    assert!(!home.path().join("token").exists());
}
