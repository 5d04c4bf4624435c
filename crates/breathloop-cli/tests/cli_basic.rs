//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_breathloop-cli"))
        .args(args)
        .env("BREATHLOOP_CONFIG_DIR", config_dir)
        .env_remove("BREATHLOOP_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(config_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(config_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_presets_list() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["presets"]);
    assert_eq!(code, 0, "Presets failed");
    assert!(stdout.contains("inhale-hold-exhale"));
    assert!(stdout.contains("inhale-exhale"));
}

#[test]
fn test_presets_json() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(dir.path(), &["presets", "--json"]);
    let presets = json.as_array().unwrap();
    assert_eq!(presets.len(), 3);
    assert_eq!(presets[0]["id"], "inhale-hold-exhale");
    assert_eq!(presets[0]["pattern"][0]["name"], "Inhale");
}

#[test]
fn test_simulate_single_cycle_completes() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(
        dir.path(),
        &[
            "simulate", "--ticks", "100", "--cycles", "1", "--sets", "1", "--relax", "0", "--json",
        ],
    );
    assert_eq!(json["ticks_delivered"], 12);
    assert_eq!(json["snapshot"]["session_complete"], true);
    assert_eq!(json["snapshot"]["running"], false);

    let events = json["events"].as_array().unwrap();
    assert_eq!(events.first().unwrap()["type"], "PhaseStart");
    assert_eq!(events.last().unwrap()["type"], "SessionComplete");
}

#[test]
fn test_simulate_stops_in_relax() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(
        dir.path(),
        &[
            "simulate", "--ticks", "12", "--cycles", "1", "--sets", "2", "--relax", "5", "--json",
        ],
    );
    assert_eq!(json["snapshot"]["label"], "Relax");
    assert_eq!(json["snapshot"]["time_remaining_secs"], 5);
    assert_eq!(json["snapshot"]["running"], true);
}

#[test]
fn test_simulate_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["simulate", "--ticks", "4", "--preset", "inhale-exhale"],
    );
    assert_eq!(code, 0, "Simulate failed");
    assert!(stdout.contains("Inhale done"));
    assert!(stdout.contains("after 4 tick(s): Exhale"));
}

#[test]
fn test_simulate_rejects_bad_override() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["simulate", "--ticks", "1", "--sets", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "session.cycles_per_set"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "5");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_feeds_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        dir.path(),
        &["config", "set", "session.cycles_per_set", "1"],
    );
    assert_eq!(code, 0, "Config set failed");
    let (_, _, code) = run_cli(
        dir.path(),
        &["config", "set", "session.number_of_sets", "1"],
    );
    assert_eq!(code, 0, "Config set failed");

    let json = run_json(dir.path(), &["simulate", "--ticks", "50", "--json"]);
    assert_eq!(json["ticks_delivered"], 12);
    assert_eq!(json["snapshot"]["session_complete"], true);
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "session.number_of_sets", "0"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "session.number_of_sets"]);
    assert_eq!(stdout.trim(), "1");
}

#[test]
fn test_config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "session.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_reset() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "notifications.volume", "20"]);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0, "Config reset failed");
    assert!(stdout.contains("reset"));

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "notifications.volume"]);
    assert_eq!(stdout.trim(), "70");
}

#[test]
fn test_debug_log_reports_session_build() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_breathloop-cli"))
        .args(["simulate", "--ticks", "4"])
        .env("BREATHLOOP_CONFIG_DIR", dir.path())
        .env("BREATHLOOP_LOG", "debug")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute CLI command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("session built"), "stderr: {stderr}");
    assert!(stderr.contains("simulation finished"), "stderr: {stderr}");
}
