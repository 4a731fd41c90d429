//! Commands that only touch settings files and never run the Pulumi CLI.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::cli_tests::pulumi_auto;

fn work_dir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[test]
fn test_project_init_writes_yaml() {
    let dir = work_dir();
    pulumi_auto()
        .args(["--work-dir"])
        .arg(dir.path())
        .args(["project", "init", "demo", "--runtime", "python"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'demo' (python)"));

    let content = std::fs::read_to_string(dir.path().join("Pulumi.yaml")).unwrap();
    assert_eq!(content, "name: demo\nruntime: python\n");
}

#[test]
fn test_project_init_keeps_existing_json_format() {
    let dir = work_dir();
    std::fs::write(dir.path().join("Pulumi.json"), r#"{"name":"old","runtime":"go"}"#).unwrap();

    pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["project", "init", "new", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replacing existing project settings."));

    assert!(!dir.path().join("Pulumi.yaml").exists());
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("Pulumi.json")).unwrap())
            .unwrap();
    assert_eq!(json["name"], "new");
    assert_eq!(json["runtime"], "nodejs");
}

#[test]
fn test_project_init_refuses_to_overwrite() {
    let dir = work_dir();
    std::fs::write(dir.path().join("Pulumi.yaml"), "name: old\nruntime: go\n").unwrap();

    pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["project", "init", "new"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    let content = std::fs::read_to_string(dir.path().join("Pulumi.yaml")).unwrap();
    assert!(content.contains("name: old"));
}

#[test]
fn test_project_show_json() {
    let dir = work_dir();
    std::fs::write(
        dir.path().join("Pulumi.yml"),
        "name: demo\nruntime:\n  name: nodejs\n  options:\n    typescript: false\ndescription: A demo\n",
    )
    .unwrap();

    let output = pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["--json", "project", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "demo");
    assert_eq!(json["runtime"]["options"]["typescript"], false);
    assert_eq!(json["description"], "A demo");
}

#[test]
fn test_project_show_without_settings_fails() {
    let dir = work_dir();
    pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["project", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project settings found"));
}

#[test]
fn test_work_dir_from_env() {
    let dir = work_dir();
    pulumi_auto()
        .env("PULUMI_AUTOMATION_WORK_DIR", dir.path())
        .args(["project", "init", "from-env"])
        .assert()
        .success();
    assert!(dir.path().join("Pulumi.yaml").is_file());
}

#[test]
fn test_stack_settings_human_output() {
    let dir = work_dir();
    std::fs::write(
        dir.path().join("Pulumi.dev.yaml"),
        "secretsprovider: passphrase\nconfig:\n  aws:region: us-west-2\n  db:password:\n    secure: AAABAcipher\n",
    )
    .unwrap();

    pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["stack", "settings", "org/proj/dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passphrase"))
        .stdout(predicate::str::contains("us-west-2"))
        .stdout(predicate::str::contains("secure (encrypted)"))
        .stdout(predicate::str::contains("AAABAcipher").not());
}

#[test]
fn test_stack_settings_json_keeps_secure_shape() {
    let dir = work_dir();
    std::fs::write(
        dir.path().join("Pulumi.dev.json"),
        r#"{"config":{"plain":"v","hidden":{"Secure":"AAAB"}}}"#,
    )
    .unwrap();

    let output = pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["--json", "stack", "settings", "dev"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["plain"], "v");
    assert_eq!(json["config"]["hidden"]["secure"], "AAAB");
}

#[test]
fn test_stack_settings_rejects_complex_value() {
    let dir = work_dir();
    std::fs::write(
        dir.path().join("Pulumi.dev.json"),
        r#"{"config":{"value":{"test":"test","nested":{"a":1}}}}"#,
    )
    .unwrap();

    let output = pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["--json", "stack", "settings", "dev"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "INVALID_SETTINGS");
    assert!(json["message"].as_str().unwrap().contains("complex objects"));
}

#[test]
fn test_invalid_stack_name_json_error() {
    let dir = work_dir();
    let output = pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["--json", "stack", "settings", "a/b/c/d"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["code"], "INVALID_STACK_NAME");
}

#[test]
fn test_stack_settings_missing_file_is_not_an_error() {
    let dir = work_dir();
    pulumi_auto()
        .arg("--work-dir")
        .arg(dir.path())
        .args(["stack", "settings", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No settings file"));
}
