//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is constructed once in `Cli::run()` from the global flags and
//! hands each command its output context, prompt policy, cancellation token
//! and a way to open the workspace.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::application::{LocalWorkspace, LocalWorkspaceOptions};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::pulumi_cmd::PulumiCmd;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by the `CI` env var).
    pub yes: bool,
}

/// Where the workspace lives and how the CLI is invoked.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFlags {
    /// Directory holding the settings files; the current directory when unset.
    pub work_dir: Option<PathBuf>,
    pub pulumi_home: Option<PathBuf>,
    pub secrets_provider: Option<String>,
    /// Program to run instead of `pulumi` from `PATH`.
    pub pulumi_bin: String,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Workspace options.
    pub workspace: WorkspaceFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` environment
    /// variable is present.
    pub non_interactive: bool,
    /// Fired on Ctrl-C; passed to every workspace operation.
    pub cancel: CancellationToken,
    workspace: WorkspaceFlags,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags, cancel: CancellationToken) -> Self {
        let ci_env = std::env::var("CI").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            non_interactive,
            cancel,
            workspace: flags.workspace,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI or `--yes` flag), returns
    /// `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    /// Workspace options derived from the global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if no work dir is given and the current directory
    /// cannot be determined.
    pub fn workspace_options(&self) -> Result<LocalWorkspaceOptions> {
        let work_dir = match &self.workspace.work_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };
        Ok(LocalWorkspaceOptions {
            work_dir: Some(work_dir),
            pulumi_home: self.workspace.pulumi_home.clone(),
            secrets_provider: self.workspace.secrets_provider.clone(),
            ..LocalWorkspaceOptions::default()
        })
    }

    /// Open the workspace in the configured work directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace cannot be initialized.
    pub async fn workspace(&self) -> Result<LocalWorkspace> {
        let cmd = PulumiCmd::with_program(TokioCommandRunner::new(), &self.workspace.pulumi_bin);
        LocalWorkspace::create_with_cmd(cmd, self.workspace_options()?, &self.cancel).await
    }
}
