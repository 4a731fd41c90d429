//! Shared test helpers: a recording `CommandRunner`, a recording hook and
//! output constructors.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use pulumi_automation::application::{
    CommandContext, CommandHook, CommandRunner, LocalWorkspace, LocalWorkspaceOptions,
};
use tokio_util::sync::CancellationToken;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Recording runner ─────────────────────────────────────────────────────────

/// One observed invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: PathBuf,
    pub env: HashMap<String, String>,
}

#[derive(Default)]
struct RunnerState {
    calls: Vec<Call>,
    /// `(argument prefix, output)`; the first matching prefix answers.
    rules: Vec<(Vec<String>, Output)>,
}

/// `CommandRunner` double that records every call and answers from canned
/// rules. Calls with no matching rule succeed with empty output. Clones share
/// state, so a test keeps one clone while the workspace owns another.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations whose arguments start with `prefix`.
    pub fn respond(&self, prefix: &[&str], output: Output) -> &Self {
        self.state.lock().unwrap().rules.push((
            prefix.iter().map(|s| (*s).to_string()).collect(),
            output,
        ));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Argument vectors of every call, in order.
    pub fn args(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|c| c.args).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        ctx: &CommandContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<Output> {
        if cancel.is_cancelled() {
            return Err(pulumi_automation::domain::WorkspaceError::Cancelled.into());
        }
        // Give concurrent callers a chance to interleave.
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            work_dir: ctx.work_dir.to_path_buf(),
            env: ctx.env.clone(),
        });
        let output = state
            .rules
            .iter()
            .find(|(prefix, _)| {
                prefix.len() <= args.len() && prefix.iter().zip(args).all(|(p, a)| p == a)
            })
            .map_or_else(|| ok_output(b""), |(_, output)| output.clone());
        Ok(output)
    }
}

// ── Recording hook ───────────────────────────────────────────────────────────

/// Hook that records the stack name of every post-command callback.
#[derive(Clone, Default)]
pub struct RecordingHook {
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl RecordingHook {
    pub fn seen(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl CommandHook for RecordingHook {
    fn post_command_callback(&self, stack_name: Option<&str>) {
        self.seen
            .lock()
            .unwrap()
            .push(stack_name.map(str::to_string));
    }
}

// ── Workspace construction ───────────────────────────────────────────────────

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Workspace in a fresh temp dir driven by `runner`. The `TempDir` must
/// outlive the workspace.
pub async fn workspace(
    runner: &RecordingRunner,
) -> (tempfile::TempDir, LocalWorkspace<RecordingRunner>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = LocalWorkspaceOptions {
        work_dir: Some(dir.path().to_path_buf()),
        ..LocalWorkspaceOptions::default()
    };
    let workspace =
        LocalWorkspace::create_with_runner(runner.clone(), options, &CancellationToken::new())
            .await
            .expect("workspace");
    (dir, workspace)
}
