//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. Callers that need to react to a
//! specific failure recover it with `anyhow::Error::downcast_ref`.

use std::fmt;

use thiserror::Error;

// ── Workspace errors ──────────────────────────────────────────────────────────

/// Errors raised by the workspace itself, before or instead of running the CLI.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Workspace is not initialized. Construct it with LocalWorkspace::create.")]
    NotReady,

    #[error("Invalid stack name '{0}': expected [org/][project/]stack with segments matching [A-Za-z0-9_.-]+")]
    InvalidStackName(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Operation cancelled")]
    Cancelled,
}

// ── Command errors ────────────────────────────────────────────────────────────

/// Captured result of a CLI invocation that exited non-zero.
#[derive(Debug, Clone)]
pub struct CommandFailure {
    /// Printable command line, with secret values masked.
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' exited with code {}\nstdout: {}\nstderr: {}",
            self.command, self.exit_code, self.stdout, self.stderr
        )
    }
}

/// Non-zero exit from the CLI, classified by its stderr.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Stack already exists: {0}")]
    StackAlreadyExists(CommandFailure),

    #[error("Stack not found: {0}")]
    StackNotFound(CommandFailure),

    #[error("Another update is currently in progress: {0}")]
    ConcurrentUpdate(CommandFailure),

    #[error("Command failed: {0}")]
    Failed(CommandFailure),
}

const ALREADY_EXISTS_PATTERN: &str = "already exists";
const NOT_FOUND_PATTERN: &str = "no stack named";
const CONFLICT_PATTERN: &str = "[409] Conflict: Another update is currently in progress.";

impl CommandError {
    /// Pick the most specific variant for the captured stderr.
    #[must_use]
    pub fn classify(failure: CommandFailure) -> Self {
        let stderr = failure.stderr.as_str();
        if stderr.contains(CONFLICT_PATTERN) {
            Self::ConcurrentUpdate(failure)
        } else if stderr.contains(ALREADY_EXISTS_PATTERN) {
            Self::StackAlreadyExists(failure)
        } else if stderr.contains(NOT_FOUND_PATTERN) {
            Self::StackNotFound(failure)
        } else {
            Self::Failed(failure)
        }
    }

    #[must_use]
    pub fn failure(&self) -> &CommandFailure {
        match self {
            Self::StackAlreadyExists(f)
            | Self::StackNotFound(f)
            | Self::ConcurrentUpdate(f)
            | Self::Failed(f) => f,
        }
    }
}
