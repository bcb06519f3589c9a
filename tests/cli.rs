//! End-to-end tests for the `rategate` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const OVERRIDE_VARS: &[&str] = &[
    "RATEGATE_HAPPINESS_THRESHOLD",
    "RATEGATE_DAYS_AFTER_FIRST_LAUNCH",
    "RATEGATE_MAX_ASKS_PER_YEAR",
    "RATEGATE_FLOOR_AT_ZERO",
    "RATEGATE_ASK_TRIGGER",
    "RATEGATE_PROMPT_COMMAND",
    "RATEGATE_APP_VERSION",
    "RATEGATE_APP_BUILD",
    "RATEGATE_LOG",
];

fn rategate(home: &Path, args: &[&str]) -> Output {
    let state = home.join("state.json");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rategate"));
    cmd.current_dir(home)
        .env("RATEGATE_HOME", home)
        .arg("--state")
        .arg(&state)
        .args(["--app-version", "1.0"])
        .args(args);
    for var in OVERRIDE_VARS {
        cmd.env_remove(var);
    }
    cmd.output().unwrap()
}

#[test]
fn test_ask_json_stdout_is_json() {
    let home = TempDir::new().unwrap();

    assert!(rategate(home.path(), &["launch", "-q"]).status.success());

    let output = rategate(home.path(), &["ask", "--force", "--json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["outcome"], "asked");
    assert_eq!(value["forced"], true);

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("review prompt requested"));
}

#[test]
fn test_happy_json_with_auto_ask_is_json() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[policy]\nhappiness_threshold = 1\ndays_after_first_launch = 0\n[ask]\ntrigger = \"on_threshold\"\n",
    )
    .unwrap();

    assert!(rategate(
        home.path(),
        &["--now", "2026-01-01T00:00:00Z", "launch", "-q"]
    )
    .status
    .success());

    let output = rategate(
        home.path(),
        &["--now", "2026-01-02T00:00:00Z", "happy", "--json"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["auto_ask"], "asked");
}

#[test]
fn test_clear_without_yes_fails() {
    let home = TempDir::new().unwrap();

    let output = rategate(home.path(), &["clear", "--json"]);

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
}
