//! Integration tests for the `garagectl` binary.
//!
//! Argument parsing, help, completions, config handling, and error exit
//! codes, plus a few runs against a `wiremock` gate controller.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
///
/// Clears every `GARAGECTL_*` variable, points HOME and XDG dirs at a
/// nonexistent path, and makes the keyring unreachable so tests never
/// touch the user's real configuration or secrets.
fn garagectl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("garagectl");
    cmd.env("HOME", "/tmp/garagectl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/garagectl-cli-test-nonexistent")
        .env("DBUS_SESSION_BUS_ADDRESS", "unix:path=/nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("GARAGECTL_CONFIG")
        .env_remove("GARAGECTL_URL")
        .env_remove("GARAGECTL_TOKEN")
        .env_remove("GARAGECTL_TOKEN_ENV")
        .env_remove("GARAGECTL_OUTPUT")
        .env_remove("GARAGECTL_TIMEOUT")
        .env_remove("GARAGECTL_OPEN_TIME_SECONDS")
        .env_remove("GARAGECTL_CLOSE_TIME_SECONDS");
    cmd
}

/// Same as [`garagectl_cmd`] with `--config` pointing into `dir`.
fn with_config(dir: &Path) -> assert_cmd::Command {
    let mut cmd = garagectl_cmd();
    cmd.arg("--config").arg(dir.join("config.toml"));
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a prepared command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn online_gate(status: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gate/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": status,
            "sensor_closed": status == "closed",
            "sensor_open": status == "open",
        })))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = garagectl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    garagectl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("gate")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("open"))
            .and(predicate::str::contains("close"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    garagectl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("garagectl"));
}

#[test]
fn test_completions_zsh() {
    garagectl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    garagectl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    let output = garagectl_cmd()
        .args(["-o", "xml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    with_config(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    with_config(dir.path())
        .args(["config", "set", "url", "gate.lan"])
        .assert()
        .success();
    with_config(dir.path())
        .args(["config", "set", "open_time_seconds", "12"])
        .assert()
        .success();

    with_config(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("url = \"gate.lan\"")
                .and(predicate::str::contains("open_time_seconds = 12"))
                .and(predicate::str::contains("close_time_seconds = 5")),
        );
}

#[test]
fn test_config_set_rejects_bad_number() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_config(dir.path())
        .args(["config", "set", "close_time_seconds", "soon"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_plaintext_token_is_redacted_in_show() {
    let dir = tempfile::tempdir().unwrap();
    with_config(dir.path())
        .args(["config", "set-token", "--plaintext", "hunter2"])
        .assert()
        .success();

    with_config(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("token = \"****\"")
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_status_without_url_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_config(dir.path()).arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(9));
    let text = combined_output(&output);
    assert!(text.contains("No gate controller URL"), "unexpected output:\n{text}");
}

#[test]
fn test_open_without_token_is_auth_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_config(dir.path())
        .args(["--url", "http://127.0.0.1:9", "open"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("No bearer token"), "unexpected output:\n{text}");
}

// ── Against a mock controller ───────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_plain_prints_gate_position() {
    let server = online_gate("closed").await;
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = with_config(dir.path());
    cmd.args(["--url", &server.uri(), "-o", "plain", "status"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "closed");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_reports_connection() {
    let server = online_gate("open").await;
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = with_config(dir.path());
    cmd.args(["--url", &server.uri(), "-o", "json", "status"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["connected"], true);
    assert_eq!(report["gate"]["status"], "open");
    assert_eq!(report["can_open"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_unreachable_is_connection_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = with_config(dir.path());
    cmd.args(["--url", &uri, "--timeout", "2", "status"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_open_sends_bearer_and_prints_refreshed_status() {
    let server = online_gate("open").await;
    Mock::given(method("GET"))
        .and(path("/gate/open"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    with_config(dir.path())
        .args(["config", "set", "open_time_seconds", "0"])
        .assert()
        .success();

    let mut cmd = with_config(dir.path());
    cmd.args(["--url", &server.uri(), "--token", "t0k", "-o", "plain", "open"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "open");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_open_report_shows_connected_device() {
    let server = online_gate("open").await;
    Mock::given(method("GET"))
        .and(path("/gate/open"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    with_config(dir.path())
        .args(["config", "set", "open_time_seconds", "0"])
        .assert()
        .success();

    let mut cmd = with_config(dir.path());
    cmd.args(["--url", &server.uri(), "--token", "t0k", "-o", "json-compact", "open"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["connected"], true);
    assert_eq!(report["gate"]["status"], "open");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_close_exits_with_rejected_code() {
    let server = online_gate("open").await;
    Mock::given(method("GET"))
        .and(path("/gate/close"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = with_config(dir.path());
    cmd.args(["--url", &server.uri(), "--token", "wrong", "close"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("did not accept the close command"));
}
