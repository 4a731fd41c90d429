//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the settings crate;
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::collections::HashMap;
use std::path::Path;
use std::process::Output;

use anyhow::Result;
use automation_settings::{ProjectSettings, StackSettings};
use tokio_util::sync::CancellationToken;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Where and with which environment a program runs.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Working directory of the spawned process.
    pub work_dir: &'a Path,
    /// Variables added on top of the inherited environment.
    pub env: &'a HashMap<String, String>,
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Implementations own process lifecycle and stream capture only; they never
/// interpret the exit code or the output.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` with `args` and capture stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned, or
    /// `WorkspaceError::Cancelled` if `cancel` fires first. A cancelled
    /// process must be killed, not left orphaned.
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        ctx: &CommandContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<Output>;
}

// ── Settings Store Port ───────────────────────────────────────────────────────

/// Locates, reads and writes project and stack settings files.
///
/// A missing file is `Ok(None)`, never an error. Writes replace the whole
/// file in one step.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Load the project settings, if any file exists.
    async fn load_project(&self, cancel: &CancellationToken) -> Result<Option<ProjectSettings>>;
    /// Persist the project settings, keeping the existing file's format.
    async fn save_project(
        &self,
        settings: &ProjectSettings,
        cancel: &CancellationToken,
    ) -> Result<()>;
    /// Load the settings of `stack_name`, if any file exists.
    async fn load_stack(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<StackSettings>>;
    /// Persist the settings of `stack_name`, keeping the existing file's format.
    async fn save_stack(
        &self,
        stack_name: &str,
        settings: &StackSettings,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

// ── Hook Port ─────────────────────────────────────────────────────────────────

/// Extension point called by the workspace around CLI invocations.
/// Called synchronously.
pub trait CommandHook: Send + Sync {
    /// Called after every CLI invocation, whether or not it succeeded.
    /// `stack_name` is set for stack-scoped invocations.
    fn post_command_callback(&self, _stack_name: Option<&str>) {}
}

/// Default hook: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl CommandHook for NoopHook {}
