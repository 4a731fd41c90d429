//! `Stack` handle: create/select semantics and delegation to the workspace.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use automation_settings::ConfigValue;
use pulumi_automation::application::{
    InlineProgramArgs, LocalProgramArgs, PulumiFn, Stack, StackInit,
};
use pulumi_automation::domain::{CommandError, WorkspaceError};
use pulumi_automation::infra::PulumiCmd;
use tokio_util::sync::CancellationToken;

use crate::helpers::{RecordingRunner, err_output, strings, workspace};

const ALREADY_EXISTS: &[u8] = b"error: stack 'dev' already exists";

#[tokio::test]
async fn test_create_or_select_falls_back_to_select() {
    let runner = RecordingRunner::new();
    runner.respond(&["stack", "init"], err_output(255, ALREADY_EXISTS));
    let (_dir, workspace) = workspace(&runner).await;

    let stack = Stack::create_or_select("dev", Arc::new(workspace), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stack.name(), "dev");
    assert_eq!(
        runner.args(),
        [
            strings(&["stack", "init", "dev"]),
            strings(&["stack", "select", "dev"]),
        ]
    );
}

#[tokio::test]
async fn test_create_or_select_propagates_other_failures() {
    let runner = RecordingRunner::new();
    runner.respond(
        &["stack", "init"],
        err_output(255, b"error: [409] Conflict: Another update is currently in progress."),
    );
    let (_dir, workspace) = workspace(&runner).await;

    let Err(err) =
        Stack::create_or_select("dev", Arc::new(workspace), &CancellationToken::new()).await
    else {
        panic!("expected failure");
    };

    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::ConcurrentUpdate(_))
    ));
    assert_eq!(runner.args().len(), 1, "no fallback select");
}

#[tokio::test]
async fn test_create_fails_when_stack_exists() {
    let runner = RecordingRunner::new();
    runner.respond(&["stack", "init"], err_output(255, ALREADY_EXISTS));
    let (_dir, workspace) = workspace(&runner).await;

    let Err(err) = Stack::create("dev", Arc::new(workspace), &CancellationToken::new()).await
    else {
        panic!("expected failure");
    };

    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::StackAlreadyExists(_))
    ));
}

#[tokio::test]
async fn test_stack_config_operations_use_stack_name() {
    let runner = RecordingRunner::new();
    let (_dir, workspace) = workspace(&runner).await;
    let cancel = CancellationToken::new();
    let stack = Stack::select("org/proj/dev", Arc::new(workspace), &cancel)
        .await
        .unwrap();

    stack
        .set_config_value("k", &ConfigValue::plain("v"), &cancel)
        .await
        .unwrap();
    stack.remove_config_value("k", &cancel).await.unwrap();

    assert_eq!(
        runner.args(),
        [
            strings(&["stack", "select", "org/proj/dev"]),
            strings(&["stack", "select", "org/proj/dev"]),
            strings(&["config", "set", "k", "v", "--plaintext"]),
            strings(&["stack", "select", "org/proj/dev"]),
            strings(&["config", "rm", "k"]),
        ]
    );
}

#[tokio::test]
async fn test_stack_settings_use_short_name_file() {
    let runner = RecordingRunner::new();
    let (dir, workspace) = workspace(&runner).await;
    let cancel = CancellationToken::new();
    let stack = Stack::select("org/proj/dev", Arc::new(workspace), &cancel)
        .await
        .unwrap();

    assert!(stack.settings(&cancel).await.unwrap().is_none());
    stack
        .save_settings(&automation_settings::StackSettings::default(), &cancel)
        .await
        .unwrap();

    assert!(dir.path().join("Pulumi.dev.yaml").is_file());
}

#[tokio::test]
async fn test_inline_program_args_write_default_project() {
    let runner = RecordingRunner::new();
    let program: PulumiFn = Arc::new(|| Ok(()));
    let dir = tempfile::tempdir().unwrap();
    let mut args = InlineProgramArgs::new("inline-proj", "dev", program);
    args.options.work_dir = Some(dir.path().to_path_buf());

    let stack = Stack::from_program_args(
        PulumiCmd::new(runner.clone()),
        args,
        StackInit::CreateOrSelect,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(stack.workspace().program().is_some());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Pulumi.yaml")).unwrap(),
        "name: inline-proj\nruntime: nodejs\n"
    );
    assert_eq!(runner.args(), [strings(&["stack", "init", "dev"])]);
}

#[tokio::test]
async fn test_local_program_args_select_in_work_dir() {
    let runner = RecordingRunner::new();
    let dir = tempfile::tempdir().unwrap();

    let stack = Stack::from_program_args(
        PulumiCmd::new(runner.clone()),
        LocalProgramArgs::new("dev", dir.path()),
        StackInit::Select,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(stack.workspace().work_dir(), dir.path());
    assert!(!stack.workspace().owns_work_dir());
    assert_eq!(runner.calls()[0].work_dir, dir.path());
}

#[tokio::test]
async fn test_program_args_with_empty_stack_name_spawn_nothing() {
    let runner = RecordingRunner::new();
    let dir = tempfile::tempdir().unwrap();

    let Err(err) = Stack::from_program_args(
        PulumiCmd::new(runner.clone()),
        LocalProgramArgs::new("", dir.path()),
        StackInit::Create,
        &CancellationToken::new(),
    )
    .await
    else {
        panic!("expected failure");
    };

    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::MissingArgument("stack_name"))
    ));
    assert!(runner.calls().is_empty());
}
