//! Tests that run the `dctest` binary.

use std::fs;
use std::process::{Command, Output};

fn dctest(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dctest"))
        .args(args)
        .env_remove("DCTEST_SETTINGS")
        .env_remove("RUST_LOG")
        .output()
        .expect("dctest binary runs")
}

#[test]
fn test_env_name_uses_prefix() {
    let output = dctest(&["env-name", "--prefix", "CITest-"]);
    assert!(output.status.success());

    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert!(name.starts_with("citest-"), "{}", name);
    assert_eq!(name.len(), "citest-".len() + 6);
}

#[test]
fn test_lint_prints_warnings_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let vars = dir.path().join("vars.tfvars.json");
    fs::write(
        &vars,
        r#"{"region": "us-east-2", "db_configuration": {"db_instance_class": "db.x9.huge"}}"#,
    )
    .unwrap();

    let output = dctest(&["lint", vars.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("db.x9.huge"));
}

#[test]
fn test_unknown_product_is_invalid_argument() {
    let output = dctest(&["plan-check", "--product", "crowd", "--modules-root", "."]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_bad_settings_file_is_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.yaml");
    fs::write(&settings, "vpc_ceiling: 0\ncandidate_regions: []\n").unwrap();

    let output = dctest(&["env-name", "--settings", settings.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_lint_ignores_broken_settings() {
    let dir = tempfile::tempdir().unwrap();
    let vars = dir.path().join("vars.tfvars.json");
    fs::write(&vars, r#"{"region": "us-east-1"}"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_dctest"))
        .args(["lint", vars.to_str().unwrap()])
        .env("DCTEST_SETTINGS", dir.path().join("missing.yaml"))
        .env_remove("RUST_LOG")
        .output()
        .expect("dctest binary runs");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No catalog warnings"));
}
