//! `LocalWorkspace`: settings files on disk plus the Pulumi CLI, behind one
//! façade.
//!
//! Construction is two-phase. [`LocalWorkspace::new`] only validates inputs
//! and picks the work directory; [`LocalWorkspace::initialize`] persists the
//! initial settings. Every other operation fails with
//! `WorkspaceError::NotReady` until initialization has completed. The
//! [`LocalWorkspace::create`] factories do both.
//!
//! The CLI tracks a "currently selected stack" outside this process. Every
//! stack-scoped operation selects its stack first and holds the workspace's
//! selection lock until it is done, so concurrent callers sharing one
//! workspace cannot interleave a select with another stack's action.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use automation_settings::{
    ConfigValue, PluginInfo, PluginKind, ProjectSettings, StackSettings, StackSummary,
    WhoAmIResult,
};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use crate::application::options::{LocalWorkspaceOptions, PulumiFn};
use crate::application::ports::{
    CommandContext, CommandHook, CommandRunner, NoopHook, SettingsStore,
};
use crate::domain::command;
use crate::domain::error::WorkspaceError;
use crate::domain::stack::validate_stack_name;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::pulumi_cmd::{CommandResult, PulumiCmd};
use crate::infra::settings_store::LocalSettingsStore;

/// Prefix of the temporary directory created when no work dir is given.
const TEMP_DIR_PREFIX: &str = "automation-";

/// Variable the CLI reads its home directory override from.
const PULUMI_HOME_VAR: &str = "PULUMI_HOME";

pub struct LocalWorkspace<R = TokioCommandRunner> {
    work_dir: PathBuf,
    owned_dir: Option<TempDir>,
    pulumi_home: Option<PathBuf>,
    program: Option<PulumiFn>,
    secrets_provider: Option<String>,
    environment_variables: HashMap<String, String>,
    /// `environment_variables` plus `PULUMI_HOME`, as passed to each process.
    process_env: HashMap<String, String>,
    cmd: PulumiCmd<R>,
    store: LocalSettingsStore,
    hook: Arc<dyn CommandHook>,
    selection: Mutex<()>,
    pending_project: Option<ProjectSettings>,
    pending_stacks: BTreeMap<String, StackSettings>,
    ready: bool,
}

impl LocalWorkspace<TokioCommandRunner> {
    /// Build and initialize a workspace that runs the `pulumi` binary on `PATH`.
    ///
    /// # Errors
    ///
    /// See [`LocalWorkspace::new`] and [`LocalWorkspace::initialize`].
    pub async fn create(
        options: LocalWorkspaceOptions,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        Self::create_with_cmd(PulumiCmd::new(TokioCommandRunner::new()), options, cancel).await
    }
}

impl<R: CommandRunner> LocalWorkspace<R> {
    /// Build and initialize a workspace that runs the CLI through `runner`.
    ///
    /// # Errors
    ///
    /// See [`LocalWorkspace::new`] and [`LocalWorkspace::initialize`].
    pub async fn create_with_runner(
        runner: R,
        options: LocalWorkspaceOptions,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        Self::create_with_cmd(PulumiCmd::new(runner), options, cancel).await
    }

    /// Build and initialize a workspace around a configured [`PulumiCmd`].
    ///
    /// # Errors
    ///
    /// See [`LocalWorkspace::new`] and [`LocalWorkspace::initialize`].
    pub async fn create_with_cmd(
        cmd: PulumiCmd<R>,
        options: LocalWorkspaceOptions,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let mut workspace = Self::new(cmd, options)?;
        workspace.initialize(cancel).await?;
        Ok(workspace)
    }

    /// First construction phase. Validates the initial settings and picks
    /// the work directory, creating an owned temporary one when none is
    /// given. Nothing is written to the work directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial project settings have no name, a
    /// stack-settings key is not a valid stack name, or the temporary
    /// directory cannot be created.
    pub fn new(cmd: PulumiCmd<R>, options: LocalWorkspaceOptions) -> Result<Self> {
        let LocalWorkspaceOptions {
            work_dir,
            pulumi_home,
            program,
            secrets_provider,
            environment_variables,
            project_settings,
            stack_settings,
        } = options;

        if let Some(project) = &project_settings {
            project.validate()?;
        }
        for name in stack_settings.keys() {
            validate_stack_name(name)?;
        }

        let (work_dir, owned_dir) = match work_dir {
            Some(dir) => (dir, None),
            None => {
                let dir = tempfile::Builder::new()
                    .prefix(TEMP_DIR_PREFIX)
                    .tempdir()
                    .context("failed to create temporary work directory")?;
                tracing::debug!(path = %dir.path().display(), "created temporary work directory");
                (dir.path().to_path_buf(), Some(dir))
            }
        };

        let mut process_env = environment_variables.clone();
        if let Some(home) = &pulumi_home {
            process_env.insert(PULUMI_HOME_VAR.to_string(), home.display().to_string());
        }

        Ok(Self {
            store: LocalSettingsStore::new(&work_dir),
            work_dir,
            owned_dir,
            pulumi_home,
            program,
            secrets_provider,
            environment_variables,
            process_env,
            cmd,
            hook: Arc::new(NoopHook),
            selection: Mutex::new(()),
            pending_project: project_settings,
            pending_stacks: stack_settings,
            ready: false,
        })
    }

    /// Second construction phase: persist the initial project and stack
    /// settings. Idempotent once it has succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be written, or
    /// `WorkspaceError::Cancelled`.
    pub async fn initialize(&mut self, cancel: &CancellationToken) -> Result<()> {
        if self.ready {
            return Ok(());
        }
        if let Some(project) = &self.pending_project {
            self.store.save_project(project, cancel).await?;
            self.pending_project = None;
        }
        while let Some((name, settings)) = self.pending_stacks.pop_first() {
            if let Err(e) = self.store.save_stack(&name, &settings, cancel).await {
                self.pending_stacks.insert(name, settings);
                return Err(e);
            }
        }
        self.ready = true;
        tracing::debug!(work_dir = %self.work_dir.display(), "workspace ready");
        Ok(())
    }

    /// Install a hook called after every CLI invocation.
    #[must_use]
    pub fn with_hook(mut self, hook: impl CommandHook + 'static) -> Self {
        self.hook = Arc::new(hook);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Whether the work directory is a temporary one removed on teardown.
    #[must_use]
    pub fn owns_work_dir(&self) -> bool {
        self.owned_dir.is_some()
    }

    #[must_use]
    pub fn pulumi_home(&self) -> Option<&Path> {
        self.pulumi_home.as_deref()
    }

    #[must_use]
    pub fn program(&self) -> Option<&PulumiFn> {
        self.program.as_ref()
    }

    #[must_use]
    pub fn secrets_provider(&self) -> Option<&str> {
        self.secrets_provider.as_deref()
    }

    #[must_use]
    pub fn environment_variables(&self) -> &HashMap<String, String> {
        &self.environment_variables
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    // ── Settings files ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub async fn project_settings(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<ProjectSettings>> {
        self.ensure_ready()?;
        self.store.load_project(cancel).await
    }

    /// # Errors
    ///
    /// Returns an error if the settings have no name or cannot be written.
    pub async fn save_project_settings(
        &self,
        settings: &ProjectSettings,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.ensure_ready()?;
        self.store.save_project(settings, cancel).await
    }

    /// # Errors
    ///
    /// Returns an error for an invalid stack name, or if the file exists but
    /// cannot be read or decoded.
    pub async fn stack_settings(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<StackSettings>> {
        self.ensure_ready()?;
        validate_stack_name(stack_name)?;
        self.store.load_stack(stack_name, cancel).await
    }

    /// # Errors
    ///
    /// Returns an error for an invalid stack name or if the file cannot be
    /// written.
    pub async fn save_stack_settings(
        &self,
        stack_name: &str,
        settings: &StackSettings,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.ensure_ready()?;
        validate_stack_name(stack_name)?;
        self.store.save_stack(stack_name, settings, cancel).await
    }

    // ── Config ────────────────────────────────────────────────────────────────

    /// Value of `key` in `stack_name`'s config, secrets decrypted.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails (including for a missing
    /// key) or an error if its output is not the expected JSON.
    pub async fn get_config_value(
        &self,
        stack_name: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfigValue> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        let result = self
            .run(&command::config_get(key), Some(stack_name), cancel)
            .await?;
        parse_json(&result.stdout, "config value")
    }

    /// Whole config of `stack_name`, secrets decrypted.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails or an error if its output is
    /// not the expected JSON.
    pub async fn get_config(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        self.show_config(stack_name, cancel).await
    }

    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails.
    pub async fn set_config_value(
        &self,
        stack_name: &str,
        key: &str,
        value: &ConfigValue,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        self.set_one(stack_name, key, value, cancel).await
    }

    /// Set every entry of `config`, one CLI call per key, in key order.
    /// Stops at the first failure; keys already set stay set.
    ///
    /// # Errors
    ///
    /// Returns the first `CommandError`.
    pub async fn set_config(
        &self,
        stack_name: &str,
        config: &BTreeMap<String, ConfigValue>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        for (key, value) in config {
            self.set_one(stack_name, key, value, cancel).await?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails.
    pub async fn remove_config_value(
        &self,
        stack_name: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        self.run(&command::config_rm(key), Some(stack_name), cancel)
            .await?;
        Ok(())
    }

    /// Remove every key in `keys`, one CLI call per key, in the given order.
    ///
    /// # Errors
    ///
    /// Returns the first `CommandError`.
    pub async fn remove_config(
        &self,
        stack_name: &str,
        keys: &[&str],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        for key in keys {
            self.run(&command::config_rm(key), Some(stack_name), cancel)
                .await?;
        }
        Ok(())
    }

    /// Replace the local config of `stack_name` with the one from its last
    /// deployment and return the result.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails.
    pub async fn refresh_config(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        self.run(&command::config_refresh(), Some(stack_name), cancel)
            .await?;
        self.show_config(stack_name, cancel).await
    }

    async fn set_one(
        &self,
        stack_name: &str,
        key: &str,
        value: &ConfigValue,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let args = command::config_set(key, &value.value, value.is_secret);
        self.run(&args, Some(stack_name), cancel).await?;
        Ok(())
    }

    async fn show_config(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        let result = self
            .run(&command::config_show(), Some(stack_name), cancel)
            .await?;
        parse_json(&result.stdout, "config")
    }

    // ── Identity ──────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails (e.g. not logged in).
    pub async fn who_am_i(&self, cancel: &CancellationToken) -> Result<WhoAmIResult> {
        self.ensure_ready()?;
        let result = self.run(&command::whoami(), None, cancel).await?;
        Ok(WhoAmIResult {
            user: result.stdout.trim().to_string(),
        })
    }

    // ── Stacks ────────────────────────────────────────────────────────────────

    /// Create `stack_name`. The CLI also selects it.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::StackAlreadyExists` if it exists, or another
    /// `CommandError`.
    pub async fn create_stack(&self, stack_name: &str, cancel: &CancellationToken) -> Result<()> {
        self.ensure_ready()?;
        validate_stack_name(stack_name)?;
        let _guard = self.lock_selection(cancel).await?;
        let args = command::stack_init(stack_name, self.secrets_provider.as_deref());
        self.run(&args, Some(stack_name), cancel).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CommandError::StackNotFound` if it does not exist, or another
    /// `CommandError`.
    pub async fn select_stack(&self, stack_name: &str, cancel: &CancellationToken) -> Result<()> {
        let _selected = self.select_locked(stack_name, cancel).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails.
    pub async fn remove_stack(&self, stack_name: &str, cancel: &CancellationToken) -> Result<()> {
        self.ensure_ready()?;
        validate_stack_name(stack_name)?;
        let _guard = self.lock_selection(cancel).await?;
        self.run(&command::stack_rm(stack_name), Some(stack_name), cancel)
            .await?;
        Ok(())
    }

    /// Stacks of the project in the work directory.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails or an error if its output is
    /// not the expected JSON.
    pub async fn list_stacks(&self, cancel: &CancellationToken) -> Result<Vec<StackSummary>> {
        self.ensure_ready()?;
        let result = self.run(&command::stack_ls(), None, cancel).await?;
        parse_json(&result.stdout, "stack list")
    }

    // ── Plugins ───────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails.
    pub async fn install_plugin(
        &self,
        name: &str,
        version: &str,
        kind: PluginKind,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.ensure_ready()?;
        if name.trim().is_empty() {
            return Err(WorkspaceError::MissingArgument("name").into());
        }
        if version.trim().is_empty() {
            return Err(WorkspaceError::MissingArgument("version").into());
        }
        self.run(&command::plugin_install(name, version, kind), None, cancel)
            .await?;
        Ok(())
    }

    /// Remove plugins of `kind`, optionally narrowed by name and version range.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails.
    pub async fn remove_plugin(
        &self,
        name: Option<&str>,
        version_range: Option<&str>,
        kind: PluginKind,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.ensure_ready()?;
        let args = command::plugin_rm(name, version_range, kind);
        self.run(&args, None, cancel).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `CommandError` if the CLI fails or an error if its output is
    /// not the expected JSON.
    pub async fn list_plugins(&self, cancel: &CancellationToken) -> Result<Vec<PluginInfo>> {
        self.ensure_ready()?;
        let result = self.run(&command::plugin_ls(), None, cancel).await?;
        parse_json(&result.stdout, "plugin list")
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ensure_ready(&self) -> Result<()> {
        if !self.ready {
            return Err(WorkspaceError::NotReady.into());
        }
        Ok(())
    }

    async fn lock_selection(&self, cancel: &CancellationToken) -> Result<MutexGuard<'_, ()>> {
        tokio::select! {
            guard = self.selection.lock() => Ok(guard),
            () = cancel.cancelled() => Err(WorkspaceError::Cancelled.into()),
        }
    }

    /// Take the selection lock and select `stack_name`. The stack stays
    /// selected for this caller until the guard is dropped.
    async fn select_locked(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<MutexGuard<'_, ()>> {
        self.ensure_ready()?;
        validate_stack_name(stack_name)?;
        let guard = self.lock_selection(cancel).await?;
        self.run(&command::stack_select(stack_name), Some(stack_name), cancel)
            .await?;
        Ok(guard)
    }

    /// One CLI invocation followed by the post-command hook, which runs
    /// whether or not the invocation succeeded.
    async fn run(
        &self,
        args: &[String],
        stack_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let ctx = CommandContext {
            work_dir: &self.work_dir,
            env: &self.process_env,
        };
        let result = self.cmd.run(&args, &ctx, cancel).await;
        self.hook.post_command_callback(stack_name);
        result
    }
}

impl<R> LocalWorkspace<R> {
    /// Tear down, removing an owned temporary work directory. Removal is best
    /// effort: a failure is logged and otherwise ignored. Dropping the
    /// workspace does the same.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(dir) = self.owned_dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => tracing::debug!(path = %path.display(), "removed temporary work directory"),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to remove temporary work directory"
                ),
            }
        }
    }
}

impl<R> Drop for LocalWorkspace<R> {
    fn drop(&mut self) {
        self.release();
    }
}

fn parse_json<T: DeserializeOwned>(stdout: &str, what: &str) -> Result<T> {
    serde_json::from_str(stdout).with_context(|| format!("failed to parse {what} JSON from CLI"))
}
