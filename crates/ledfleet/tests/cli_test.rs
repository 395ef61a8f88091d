//! Integration tests for the `ledfleet` CLI binary.
//!
//! Argument parsing, config errors, and exit codes run without any
//! device; the fleet tests stand up wiremock servers as strips.
#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `ledfleet` binary with env isolation.
fn ledfleet_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ledfleet");
    cmd.env("HOME", "/tmp/ledfleet-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ledfleet-cli-test-nonexistent")
        .env_remove("LEDFLEET_CONFIG")
        .env_remove("LEDFLEET_DEFAULTS__OUTPUT")
        .env_remove("LEDFLEET_TIMING__PROBE_TIMEOUT_MS")
        .env_remove("LEDFLEET_TIMING__COMMAND_TIMEOUT_MS")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a config listing `devices` as `(name, host)` pairs.
fn config_file(devices: &[(&str, &str)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[timing]\nprobe_timeout_ms = 1000\ncommand_timeout_ms = 1000\n"
    )
    .unwrap();
    for (name, host) in devices {
        writeln!(file, "[[devices]]\nname = \"{name}\"\nhost = \"{host}\"\n").unwrap();
    }
    file
}

fn fleet_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = ledfleet_cmd();
    cmd.arg("--config").arg(config).arg("--color").arg("never");
    cmd
}

/// Run the binary off the async runtime so wiremock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "success": true,
        "message": "success",
        "data": data
    }))
}

async fn strip() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

async fn unreachable_host() -> String {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    uri
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = ledfleet_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    ledfleet_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("LED strips")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("scripts"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    ledfleet_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ledfleet"));
}

#[test]
fn test_completions_bash() {
    ledfleet_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_hue_is_usage_error() {
    ledfleet_cmd()
        .args(["color", "--hue", "400"])
        .assert()
        .code(2);
}

#[test]
fn test_scripts_copy_requires_target() {
    ledfleet_cmd()
        .args(["scripts", "copy", "--from", "kitchen", "rainbow"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    ledfleet_cmd()
        .args(["config", "path", "--config", "/tmp/elsewhere/fleet.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/elsewhere/fleet.toml"));
}

#[test]
fn test_config_effective_merges_env() {
    let file = config_file(&[("kitchen", "kitchen.local")]);
    ledfleet_cmd()
        .arg("--config")
        .arg(file.path())
        .env("LEDFLEET_TIMING__OFFLINE_INTERVAL_MS", "2500")
        .args(["config", "effective"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("offline_interval_ms = 2500")
                .and(predicate::str::contains("kitchen.local")),
        );
}

#[test]
fn test_missing_explicit_config_exits_config() {
    ledfleet_cmd()
        .args(["devices", "--config", "/tmp/ledfleet-cli-test-nonexistent/none.toml"])
        .assert()
        .code(3);
}

#[test]
fn test_no_devices_configured_exits_config() {
    let file = config_file(&[]);
    fleet_cmd(file.path())
        .arg("devices")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_unknown_device_exits_not_found() {
    let file = config_file(&[("kitchen", "kitchen.local")]);
    fleet_cmd(file.path())
        .args(["scripts", "list", "garage"])
        .assert()
        .code(4);
}

#[test]
fn test_delete_without_yes_is_refused_non_interactively() {
    let file = config_file(&[("kitchen", "kitchen.local")]);
    fleet_cmd(file.path())
        .args(["scripts", "delete", "kitchen", "rainbow"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Fleet ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_json_reports_connectivity() {
    let server = strip().await;
    let down = unreachable_host().await;
    let file = config_file(&[("kitchen", server.uri().as_str()), ("porch", down.as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["devices", "--output", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let devices: Value = serde_json::from_slice(&output.stdout).unwrap();
    let devices = devices.as_array().unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["name"], "kitchen");
    assert_eq!(devices[0]["online"], true);
    assert!(devices[0]["last_seen"].is_string());
    assert_eq!(devices[1]["name"], "porch");
    assert_eq!(devices[1]["online"], false);
    assert!(devices[1]["last_seen"].is_null());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2 device(s) online"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_color_reaches_every_online_device() {
    let kitchen = strip().await;
    let porch = strip().await;
    for server in [&kitchen, &porch] {
        Mock::given(method("GET"))
            .and(path("/api/color"))
            .and(query_param("hue", "120"))
            .and(query_param("saturation", "100"))
            .and(query_param("lightness", "50"))
            .respond_with(ok(json!({})))
            .expect(1)
            .mount(server)
            .await;
    }
    let file = config_file(&[("kitchen", kitchen.uri().as_str()), ("porch", porch.uri().as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["color", "--hue", "120", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["ok"] == true));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_partial_failure_still_succeeds() {
    let kitchen = strip().await;
    let porch = strip().await;
    Mock::given(method("GET"))
        .and(path("/api/off"))
        .respond_with(ok(json!({})))
        .mount(&kitchen)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/off"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "busy"
        })))
        .mount(&porch)
        .await;
    let file = config_file(&[("kitchen", kitchen.uri().as_str()), ("porch", porch.uri().as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.arg("off");
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("off failed on 1 of 2"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_named_device_only() {
    let kitchen = strip().await;
    let porch = strip().await;
    Mock::given(method("GET"))
        .and(path("/api/on"))
        .and(query_param("level", "40"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&kitchen)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/on"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&porch)
        .await;
    let file = config_file(&[("kitchen", kitchen.uri().as_str()), ("porch", porch.uri().as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["white", "--level", "40", "--device", "Kitchen"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_online_devices_exits_unreachable() {
    let down = unreachable_host().await;
    let file = config_file(&[("porch", down.as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["color", "--hue", "10"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("No online devices"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_requires_script_on_every_target() {
    let kitchen = strip().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ok(json!({"scripts": ["rainbow"]})))
        .mount(&kitchen)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/run/fire"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&kitchen)
        .await;
    let file = config_file(&[("kitchen", kitchen.uri().as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["run", "fire"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scripts_list_table() {
    let kitchen = strip().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ok(json!({
            "scripts": [{"fileName": "rainbow", "name": "Rainbow"}, "candle"]
        })))
        .mount(&kitchen)
        .await;
    let file = config_file(&[("kitchen", kitchen.uri().as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["scripts", "list", "kitchen"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rainbow"));
    assert!(stdout.contains("candle"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_reports_offline_device() {
    let down = unreachable_host().await;
    let file = config_file(&[("porch", down.as_str())]);

    let mut cmd = fleet_cmd(file.path());
    cmd.args(["watch", "--seconds", "2", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["event"], "deviceOffline");
    assert_eq!(first["device"]["name"], "porch");
}
