//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed kill on cancel or timeout.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{CommandContext, CommandRunner};
use crate::domain::error::WorkspaceError;

/// Production `CommandRunner`: uses tokio for async process execution.
///
/// Each call is a fresh spawn in the context's working directory with the
/// context's variables layered over the inherited environment. The child is
/// killed explicitly when `cancel` fires or the optional timeout elapses;
/// `kill_on_drop(true)` covers the remaining paths.
#[derive(Debug, Default, Clone)]
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    /// Runner without a timeout. Plugin installs and stack operations can
    /// legitimately take minutes.
    #[must_use]
    pub fn new() -> Self {
        Self { timeout: None }
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        ctx: &CommandContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<Output> {
        if cancel.is_cancelled() {
            return Err(WorkspaceError::Cancelled.into());
        }

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(ctx.work_dir)
            .envs(ctx.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();
        let timeout = self.timeout;

        // Read stdout/stderr concurrently with wait(): a child that fills the
        // pipe buffer blocks on write and wait() alone would never resolve.
        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = cancel.cancelled() => {
                let _ = child.kill().await;
                Err(WorkspaceError::Cancelled.into())
            }
            () = async {
                match timeout {
                    Some(t) => tokio::time::sleep(t).await,
                    None => std::future::pending().await,
                }
            } => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.unwrap_or_default().as_secs())
            }
        }
    }
}
