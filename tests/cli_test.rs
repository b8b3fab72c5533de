#![allow(deprecated)]

//! End-to-end tests for the `tomo-sidebar` binary
//!
//! Configuration handling is checked without a backend; the commands that
//! talk to one run against a `wiremock` server.
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn sidebar() -> Command {
    let mut cmd = Command::cargo_bin("tomo-sidebar").unwrap();
    cmd.env_remove("TOMO_API_BASE_URL")
        .env_remove("TOMO_SESSION_COOKIE")
        .env_remove("RUST_LOG");
    cmd
}

async fn backend_with_conversations() -> MockServer {
    let server = MockServer::start().await;
    let conversations = json!([
        common::conversation_json("a", "Oldest chat", "chat", "2024-01-01T00:00:00Z", None),
        common::conversation_json(
            "b",
            "Pinned chat",
            "chat",
            "2024-01-02T00:00:00Z",
            Some("2024-01-05T00:00:00Z"),
        ),
    ]);
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conversations))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_version_flag() {
    sidebar().arg("--version").assert().success();
}

#[test]
fn test_invalid_base_url_in_config_is_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("api:\n  base_url: ftp://example.org\n");

    sidebar()
        .arg("--config")
        .arg(config_path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must use http or https"));
}

#[test]
fn test_zero_long_press_is_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("gestures:\n  long_press_ms: 0\n");

    sidebar()
        .arg("--config")
        .arg(config_path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("long_press_ms"));
}

#[test]
fn test_malformed_config_is_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("api: [not, a, map\n");

    sidebar()
        .arg("--config")
        .arg(config_path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_in_sidebar_order() {
    let server = backend_with_conversations().await;

    let output = sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("list")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["conversation_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_base_url_from_environment() {
    let server = backend_with_conversations().await;

    sidebar()
        .env("TOMO_API_BASE_URL", server.uri())
        .arg("search")
        .arg("pinned")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pinned chat"))
        .stdout(predicate::str::contains("Oldest chat").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rename_sends_alias() {
    let server = backend_with_conversations().await;
    Mock::given(method("PUT"))
        .and(path("/api/conversations/a/rename"))
        .and(body_json(json!({ "alias": "Renamed" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("rename")
        .arg("a")
        .arg("Renamed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed a"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_star_failure_exits_non_zero() {
    let server = backend_with_conversations().await;
    Mock::given(method("PUT"))
        .and(path("/api/conversations/a/star"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("star")
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to toggle star."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_unknown_conversation_fails() {
    let server = backend_with_conversations().await;

    sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("delete")
        .arg("missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversation not found: missing"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_all_with_yes_skips_prompt() {
    let server = backend_with_conversations().await;
    Mock::given(method("DELETE"))
        .and(path("/api/conversations/all"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("delete-all")
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 conversations"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_all_declined_sends_nothing() {
    let server = backend_with_conversations().await;
    Mock::given(method("DELETE"))
        .and(path("/api/conversations/all"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("delete-all")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    sidebar()
        .arg("--base-url")
        .arg(server.uri())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}
