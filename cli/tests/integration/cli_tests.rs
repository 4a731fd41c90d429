//! Argument parsing and help output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn pulumi_auto() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pulumi-auto"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("PULUMI_AUTOMATION_WORK_DIR");
    cmd.env_remove("PULUMI_HOME");
    cmd
}

#[test]
fn test_no_args_shows_help_and_exits_two() {
    pulumi_auto()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_help_lists_command_groups() {
    pulumi_auto()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("stack"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("plugin"))
        .stdout(predicate::str::contains("whoami"));
}

#[test]
fn test_version_flag() {
    pulumi_auto()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pulumi-auto"));
}

#[test]
fn test_config_requires_stack() {
    pulumi_auto()
        .args(["config", "get", "aws:region"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--stack"));
}

#[test]
fn test_unknown_runtime_rejected() {
    pulumi_auto()
        .args(["project", "init", "demo", "--runtime", "cobol"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nodejs"));
}
