//! Commands that run the external CLI, driven by a shell script standing in
//! for `pulumi`.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::fs::PermissionsExt as _;
use std::path::PathBuf;

use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

use crate::cli_tests::pulumi_auto;

/// Script that appends its arguments to `calls.log` and answers the
/// invocations the tests use.
const FAKE_PULUMI: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/calls.log"
case "$*" in
  "whoami") echo "alice" ;;
  "stack ls --json")
    echo '[{"name":"dev","current":true,"updateInProgress":false,"resourceCount":3},{"name":"prod","current":false,"updateInProgress":false}]' ;;
  "stack select missing")
    echo "error: no stack named 'missing' found" >&2
    exit 255 ;;
  "stack init taken")
    echo "error: stack 'taken' already exists" >&2
    exit 255 ;;
  "config --show-secrets --json")
    echo '{"aws:region":{"value":"us-west-2","secret":false},"db:password":{"value":"hunter2","secret":true}}' ;;
  "plugin ls --json")
    echo '[{"name":"aws","kind":"resource","version":"6.0.0","size":2048}]' ;;
  *) ;;
esac
"#;

struct Fixture {
    _bin_dir: TempDir,
    work_dir: TempDir,
    bin: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let bin_dir = tempfile::tempdir().expect("tempdir");
        let bin = bin_dir.path().join("pulumi");
        std::fs::write(&bin, FAKE_PULUMI).unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self {
            _bin_dir: bin_dir,
            work_dir: tempfile::tempdir().expect("tempdir"),
            bin,
        }
    }

    fn command(&self) -> assert_cmd::Command {
        let mut cmd = pulumi_auto();
        cmd.arg("--pulumi-bin")
            .arg(&self.bin)
            .arg("--work-dir")
            .arg(self.work_dir.path());
        cmd
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.bin.with_file_name("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
#[serial]
fn test_whoami_prints_user() {
    let fixture = Fixture::new();
    fixture
        .command()
        .arg("whoami")
        .assert()
        .success()
        .stdout("alice\n");
}

#[test]
#[serial]
fn test_stack_ls_json() {
    let fixture = Fixture::new();
    let output = fixture.command().args(["--json", "stack", "ls"]).output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stacks = json.as_array().unwrap();
    assert_eq!(stacks.len(), 2);
    assert_eq!(stacks[0]["name"], "dev");
    assert_eq!(stacks[0]["current"], true);
    assert_eq!(stacks[0]["resourceCount"], 3);
}

#[test]
#[serial]
fn test_stack_ls_human_marks_current() {
    let fixture = Fixture::new();
    fixture
        .command()
        .args(["stack", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* dev"))
        .stdout(predicate::str::contains("prod"));
}

#[test]
#[serial]
fn test_select_missing_stack_reports_code() {
    let fixture = Fixture::new();
    let output = fixture
        .command()
        .args(["--json", "stack", "select", "missing"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "STACK_NOT_FOUND");
}

#[test]
#[serial]
fn test_init_existing_stack_reports_code() {
    let fixture = Fixture::new();
    let output = fixture
        .command()
        .args(["--json", "stack", "init", "taken"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["code"], "STACK_ALREADY_EXISTS");
}

#[test]
#[serial]
fn test_config_show_masks_secrets() {
    let fixture = Fixture::new();
    fixture
        .command()
        .args(["config", "show", "--stack", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("us-west-2"))
        .stdout(predicate::str::contains("[secret]"))
        .stdout(predicate::str::contains("hunter2").not());

    assert_eq!(
        fixture.calls(),
        ["stack select dev", "config --show-secrets --json"]
    );
}

#[test]
#[serial]
fn test_config_set_all_runs_sequentially_after_select() {
    let fixture = Fixture::new();
    fixture
        .command()
        .args([
            "config",
            "set-all",
            "--stack",
            "dev",
            "--plaintext",
            "b=2",
            "--plaintext",
            "a=1",
            "--secret",
            "c=3",
        ])
        .assert()
        .success();

    assert_eq!(
        fixture.calls(),
        [
            "stack select dev",
            "config set a 1 --plaintext",
            "config set b 2 --plaintext",
            "config set c 3 --secret",
        ]
    );
}

#[test]
#[serial]
fn test_plugin_ls_json() {
    let fixture = Fixture::new();
    let output = fixture.command().args(["--json", "plugin", "ls"]).output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["name"], "aws");
    assert_eq!(json[0]["kind"], "resource");
}

#[test]
#[serial]
fn test_stack_rm_with_yes_skips_prompt() {
    let fixture = Fixture::new();
    fixture
        .command()
        .args(["--yes", "stack", "rm", "dev"])
        .assert()
        .success();

    assert_eq!(fixture.calls(), ["stack rm --yes dev"]);
}
