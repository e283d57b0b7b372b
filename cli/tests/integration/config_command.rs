//! `guestbox config` against temporary configuration files.

use std::io::Write;

use predicates::prelude::*;

use crate::cli_tests::guestbox;

#[test]
fn test_config_path_honours_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yaml");

    guestbox()
        .env("GUESTBOX_CONFIG", &path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_string_lossy().as_ref()));
}

#[test]
fn test_config_flag_overrides_env() {
    let dir = tempfile::tempdir().unwrap();
    let from_flag = dir.path().join("flag.yaml");

    guestbox()
        .env("GUESTBOX_CONFIG", dir.path().join("env.yaml"))
        .arg("--config")
        .arg(&from_flag)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flag.yaml"));
}

#[test]
fn test_config_show_json_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "guest:\n  image: registry.example.com/guest:2025").unwrap();

    let out = guestbox()
        .env("GUESTBOX_CONFIG", file.path())
        .args(["config", "show", "--json"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let body: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body["guest"]["image"], "registry.example.com/guest:2025");
    assert_eq!(body["target"]["sock_path"], "/var/run/docker.sock");
}

#[test]
fn test_config_show_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    guestbox()
        .env("GUESTBOX_CONFIG", dir.path().join("absent.yaml"))
        .args(["config", "show"])
        .assert()
        .success();
}

#[test]
fn test_config_show_rejects_malformed_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "guest: [not, a, mapping").unwrap();

    guestbox()
        .env("GUESTBOX_CONFIG", file.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_remote_target_without_user_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "target:\n  remote_hostname: builder.internal").unwrap();

    guestbox()
        .env("GUESTBOX_CONFIG", file.path())
        .arg("doctor")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "remote target 'builder.internal' needs a remote user",
        ));
}
