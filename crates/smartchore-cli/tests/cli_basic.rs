//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::process::Command;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_smartchore"))
        .args(args)
        .env("SMARTCHORE_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn seed_members(dir: &TempDir) {
    run_ok(dir, &["member", "add", "alice", "--name", "Alice", "--skill", "cooking=9"]);
    run_ok(
        dir,
        &["member", "add", "bob", "--name", "Bob", "--skill", "cooking=2", "--dislike", "cooking"],
    );
}

#[test]
fn test_member_add_and_list() {
    let dir = TempDir::new().unwrap();
    seed_members(&dir);

    let out = run_ok(&dir, &["member", "list", "--json"]);
    let members: serde_json::Value = serde_json::from_str(&out).unwrap();
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["id"], "alice");
    assert_eq!(members[0]["skills"]["cooking"], 9);
}

#[test]
fn test_member_without_name_gets_placeholder() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["member", "add", "ghost"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("warning"));

    let out = run_ok(&dir, &["member", "list"]);
    assert!(out.contains("a member"));
}

#[test]
fn test_assign_json() {
    let dir = TempDir::new().unwrap();
    seed_members(&dir);

    let out = run_ok(&dir, &["assign", "--date", "2026-10-14", "--json", "--offline"]);
    let run: serde_json::Value = serde_json::from_str(&out).unwrap();
    let result = &run["result"];
    assert_eq!(result["date"], "2026-10-14");

    let dinner = result["assignments"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["chore_id"] == "cooking_dinner")
        .unwrap();
    assert_eq!(dinner["member_id"], "alice");

    let score = result["fairness"]["score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
    assert!(!result["advisories"].as_array().unwrap().is_empty());
}

#[test]
fn test_assign_text_output_and_history() {
    let dir = TempDir::new().unwrap();
    seed_members(&dir);

    let out = run_ok(&dir, &["assign", "--date", "2026-10-14", "--offline"]);
    assert!(out.contains("Chores for 2026-10-14"));
    assert!(out.contains("Workload"));

    let history = run_ok(&dir, &["history", "--json"]);
    let runs: serde_json::Value = serde_json::from_str(&history).unwrap();
    assert_eq!(runs.as_array().unwrap().len(), 1);
    assert_eq!(runs[0]["date"], "2026-10-14");
}

#[test]
fn test_assign_without_members_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["assign", "--offline"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No household members"));
}

#[test]
fn test_away_and_remove() {
    let dir = TempDir::new().unwrap();
    seed_members(&dir);

    run_ok(
        &dir,
        &[
            "away", "add", "bob", "--from", "2026-10-14T00:00", "--to", "2026-10-14T23:00",
            "--title", "Trip",
        ],
    );
    let out = run_ok(&dir, &["away", "list", "--date", "2026-10-14"]);
    assert!(out.contains("Trip"));

    let (_, _, code) = run_cli(
        &dir,
        &["away", "add", "bob", "--from", "2026-10-14T10:00", "--to", "2026-10-14T09:00"],
    );
    assert_ne!(code, 0);

    run_ok(&dir, &["member", "remove", "bob"]);
    let (_, stderr, code) = run_cli(&dir, &["member", "remove", "bob"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown member"));
}

#[test]
fn test_catalog_list() {
    let dir = TempDir::new().unwrap();
    let all = run_ok(&dir, &["catalog", "list"]);
    assert!(all.contains("deep_cleaning"));

    // 2026-10-14 is a Wednesday: daily chores only
    let due = run_ok(&dir, &["catalog", "list", "--date", "2026-10-14", "--json"]);
    let due: serde_json::Value = serde_json::from_str(&due).unwrap();
    let ids: Vec<&str> = due
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["chore_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["cooking_breakfast", "cooking_dinner", "dishes", "trash_prep"]);
    assert_eq!(due[0]["category"], "kitchen");
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_ok(&dir, &["config", "get", "engine.repair_gap_minutes"]).trim(), "60");

    run_ok(&dir, &["config", "set", "engine.repair_gap_minutes", "30"]);
    assert_eq!(run_ok(&dir, &["config", "get", "engine.repair_gap_minutes"]).trim(), "30");

    let (_, _, code) = run_cli(&dir, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    run_ok(&dir, &["config", "reset"]);
    assert_eq!(run_ok(&dir, &["config", "get", "engine.repair_gap_minutes"]).trim(), "60");
}
