//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run with HOME pointed at a
//! scratch directory, so each test gets its own config and database.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "fifteen-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("FIFTEEN_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_preview_default_day() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["preview"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("64 time blocks"), "got: {stdout}");
}

#[test]
fn test_preview_drops_remainder() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["preview", "07:00", "07:40"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("2 time blocks"), "got: {stdout}");
}

#[test]
fn test_setup_rejects_inverted_times() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["setup", "23:00", "07:00"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"), "got: {stderr}");
}

#[test]
fn test_show_without_setup() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["day", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No timeline available"));
}

#[test]
fn test_label_and_same_as_previous() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["setup", "07:00", "23:00"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("64 time blocks"));

    assert_eq!(run_cli(home.path(), &["block", "set", "0", "life"]).0, 0);
    assert_eq!(run_cli(home.path(), &["block", "same", "1"]).0, 0);

    let (code, stdout, _) = run_cli(home.path(), &["day", "show", "--json"]);
    assert_eq!(code, 0);
    let day: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let blocks = day["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 64);
    assert_eq!(blocks[0]["slot"], "life");
    assert_eq!(blocks[1]["slot"], "life");
    assert!(blocks[2]["slot"].is_null());
}

#[test]
fn test_day_show_lists_every_label_share() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_cli(home.path(), &["setup", "07:00", "08:00"]).0, 0);
    assert_eq!(run_cli(home.path(), &["block", "set", "0", "productive"]).0, 0);

    let (code, stdout, _) = run_cli(home.path(), &["day", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("1/4"), "got: {stdout}");
    assert!(
        stdout.contains("Productive 25%  Life 0%  Unproductive 0%"),
        "got: {stdout}"
    );
}

#[test]
fn test_block_index_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["setup", "07:00", "08:00"]);
    let (code, _, stderr) = run_cli(home.path(), &["block", "set", "4", "life"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("out of range"), "got: {stderr}");
}

#[test]
fn test_config_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(
        run_cli(home.path(), &["config", "set", "blocks.slice_minutes", "30"]).0,
        0
    );
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "blocks.slice_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (code, _, _) = run_cli(home.path(), &["config", "get", "blocks.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_json_backend() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["config", "set", "storage.backend", "json"]);
    assert_eq!(run_cli(home.path(), &["setup", "07:00", "09:00"]).0, 0);
    assert!(home.path().join(".config/fifteen/days.json").exists());
}
