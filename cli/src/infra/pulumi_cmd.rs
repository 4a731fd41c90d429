//! Pulumi CLI adapter: runs one invocation and turns the exit status into a
//! typed result.

use std::time::Instant;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{CommandContext, CommandRunner};
use crate::domain::command::display_command;
use crate::domain::error::{CommandError, CommandFailure};

/// Program name looked up on `PATH` when no explicit binary is configured.
pub const PULUMI_BIN: &str = "pulumi";

/// Captured output of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Runs the Pulumi CLI through a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct PulumiCmd<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> PulumiCmd<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, PULUMI_BIN)
    }

    #[must_use]
    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `pulumi <args>` in `ctx.work_dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the process exits non-zero,
    /// `WorkspaceError::Cancelled` if `cancel` fires, or the runner's error if
    /// the process cannot be spawned.
    pub async fn run(
        &self,
        args: &[&str],
        ctx: &CommandContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        let command = display_command(&self.program, args);
        tracing::debug!(%command, work_dir = %ctx.work_dir.display(), "running");
        let started = Instant::now();

        let output = self.runner.run(&self.program, args, ctx, cancel).await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(
            %command,
            exit_code,
            elapsed = ?started.elapsed(),
            "finished"
        );

        if !output.status.success() {
            let error = CommandError::classify(CommandFailure {
                command,
                exit_code,
                stdout,
                stderr,
            });
            tracing::debug!(error = %error, "command failed");
            return Err(error.into());
        }
        Ok(CommandResult {
            stdout,
            stderr,
            exit_code,
        })
    }
}
