//! Integration tests for the `pb` CLI.
//!
//! Each test points the config and state directories at a temp dir, runs `pb`
//! as a subprocess, and verifies stdout, stderr and the config file. Nothing
//! here needs a running server: commands that would talk to one are aimed at
//! a closed port.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Nothing listens here, so every request fails fast.
const DEAD_API: &str = "http://127.0.0.1:1/api";

/// Get the path to the built `pb` binary.
fn pb_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("pb");
    path
}

/// Run `pb` with config and logs under `home`, returning (stdout, stderr, success).
fn run_pb(home: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(pb_bin())
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .output()
        .expect("failed to run pb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `pb` expecting success, return stdout.
fn run_pb_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_pb(home, args);
    if !success {
        panic!(
            "pb {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn config_file(home: &Path) -> PathBuf {
    home.join("config").join("phaseboard").join("config.toml")
}

// ---------------------------------------------------------------------------
// Help and parsing
// ---------------------------------------------------------------------------

#[test]
fn test_help_lists_commands() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pb_ok(tmp.path(), &["--help"]);
    for command in ["projects", "charter", "risks", "phase", "config"] {
        assert!(out.contains(command), "missing {command} in:\n{out}");
    }
}

#[test]
fn test_unknown_flag_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_pb(tmp.path(), &["risks", "add", "--colour", "red"]);
    assert!(!success);
    assert!(stderr.contains("--colour"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_path_respects_xdg() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pb_ok(tmp.path(), &["config", "path"]);
    assert_eq!(out.trim(), config_file(tmp.path()).display().to_string());
}

#[test]
fn test_config_defaults_without_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pb_ok(tmp.path(), &["config", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["api"]["base_url"], "http://localhost:4000/api");
    assert_eq!(parsed["api"]["timeout_secs"], 30);
    assert!(!config_file(tmp.path()).exists());
}

#[test]
fn test_config_set_round_trips_through_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pb_ok(tmp.path(), &["config", "set", "api.timeout_secs", "5"]);
    assert_eq!(out.trim(), "api.timeout_secs = 5");
    run_pb_ok(tmp.path(), &["config", "set", "ui.colors.highlight", "#112233"]);

    let text = fs::read_to_string(config_file(tmp.path())).unwrap();
    assert!(text.contains("timeout_secs = 5"));

    let out = run_pb_ok(tmp.path(), &["config", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["api"]["timeout_secs"], 5);
    assert_eq!(parsed["ui"]["colors"]["highlight"], "#112233");
}

#[test]
fn test_config_set_rejects_bad_input() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_pb(tmp.path(), &["config", "set", "api.colour", "x"]);
    assert!(!success);
    assert!(stderr.starts_with("error: unknown config key"), "{stderr}");

    let (_, stderr, success) =
        run_pb(tmp.path(), &["config", "set", "api.base_url", "ftp://example.com"]);
    assert!(!success);
    assert!(stderr.contains("invalid value for api.base_url"), "{stderr}");
    assert!(!config_file(tmp.path()).exists());
}

#[test]
fn test_broken_config_file_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = config_file(tmp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[api\nbase_url = ").unwrap();
    let (_, stderr, success) = run_pb(tmp.path(), &["config"]);
    assert!(!success);
    assert!(stderr.contains("could not parse"), "{stderr}");
}

// ---------------------------------------------------------------------------
// Server commands
// ---------------------------------------------------------------------------

#[test]
fn test_unreachable_server_exits_nonzero() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, stderr, success) = run_pb(tmp.path(), &["--api", DEAD_API, "projects"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("error:"), "{stderr}");
    assert!(stderr.contains("/projects"));
}

#[test]
fn test_unknown_phase_prints_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    // Never reaches the (dead) server
    let out = run_pb_ok(tmp.path(), &["--api", DEAD_API, "phase", "Bogus"]);
    assert_eq!(out, "");
}

#[test]
fn test_logs_go_to_state_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_pb(tmp.path(), &["--api", DEAD_API, "projects"]);
    let log_dir = tmp.path().join("state").join("phaseboard");
    let logs: Vec<_> = fs::read_dir(&log_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("phaseboard"))
        .collect();
    assert!(!logs.is_empty(), "no log file in {}", log_dir.display());
}
