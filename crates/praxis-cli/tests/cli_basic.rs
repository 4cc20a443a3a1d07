//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Only
//! commands that touch no ledger state are exercised here; the unlock
//! flow itself is covered by the core integration tests.

use std::process::Command;

/// Run a CLI command and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "praxis-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0, "help failed");
    assert!(stdout.contains("Praxis CLI"));
    assert!(stdout.contains("gate"));
    assert!(stdout.contains("progress"));
}

#[test]
fn test_completions() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("praxis-cli"));
}

#[test]
fn test_unknown_topic_is_rejected() {
    let (_, stderr, code) = run_cli(&["progress", "show", "--user", "u1", "--topic", "9"]);
    assert_ne!(code, 0, "topic 9 must be rejected");
    assert!(stderr.contains("unknown topic id"));
}
