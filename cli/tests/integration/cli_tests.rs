//! Argument parsing, help, and error reporting of the `guestbox` binary.

use assert_cmd::Command;
use predicates::prelude::*;

pub fn guestbox() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("guestbox"));
    cmd.env("NO_COLOR", "1")
        .env_remove("GUESTBOX_WORKSPACE")
        .env_remove("GUESTBOX_CONFIG");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    guestbox().assert().code(2).stderr(predicate::str::contains(
        "Run a virtualized guest OS",
    ));
}

#[test]
fn test_cli_help_lists_lifecycle_commands() {
    guestbox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("destroy"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    guestbox()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_version_command_human() {
    guestbox()
        .arg("version")
        .assert()
        .success()
        .stdout("guestbox 0.1.0\n");
}

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "yes", "true"] {
        guestbox()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout("guestbox 0.1.0\n");
    }
}

#[test]
fn test_version_command_json() {
    let out = guestbox().args(["version", "--json"]).output().unwrap();
    assert!(out.status.success());
    let body: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body["version"], "0.1.0");
}

#[test]
fn test_unknown_command_fails() {
    guestbox()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_status_requires_workspace() {
    guestbox()
        .arg("status")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--workspace"));
}

#[test]
fn test_missing_workspace_file_reports_error() {
    guestbox()
        .args(["status", "--workspace", "/nonexistent/guestbox/ws.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: cannot read workspace file"));
}

#[test]
fn test_missing_workspace_file_json_error_on_stdout() {
    let out = guestbox()
        .args(["start", "--json", "-w", "/nonexistent/guestbox/ws.json"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let body: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "ERROR");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("cannot read workspace file")
    );
}

#[test]
fn test_stop_accepts_runtime_only_flag() {
    guestbox()
        .args(["stop", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--runtime-only"));
}
