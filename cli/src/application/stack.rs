//! `Stack`: a named stack bound to a shared workspace.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use automation_settings::{ConfigValue, StackSettings};
use tokio_util::sync::CancellationToken;

use crate::application::options::ProgramArgs;
use crate::application::ports::CommandRunner;
use crate::application::workspace::LocalWorkspace;
use crate::domain::error::CommandError;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::pulumi_cmd::PulumiCmd;

/// How a [`Stack`] comes to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackInit {
    Create,
    Select,
    /// Create, falling back to select if the stack already exists.
    CreateOrSelect,
}

pub struct Stack<R = TokioCommandRunner> {
    name: String,
    workspace: Arc<LocalWorkspace<R>>,
}

impl<R: CommandRunner> Stack<R> {
    /// # Errors
    ///
    /// Returns `CommandError::StackAlreadyExists` if the stack exists.
    pub async fn create(
        name: impl Into<String>,
        workspace: Arc<LocalWorkspace<R>>,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        Self::init(name.into(), workspace, StackInit::Create, cancel).await
    }

    /// # Errors
    ///
    /// Returns `CommandError::StackNotFound` if the stack does not exist.
    pub async fn select(
        name: impl Into<String>,
        workspace: Arc<LocalWorkspace<R>>,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        Self::init(name.into(), workspace, StackInit::Select, cancel).await
    }

    /// # Errors
    ///
    /// Returns a `CommandError` other than `StackAlreadyExists` from create,
    /// or any error from the fallback select.
    pub async fn create_or_select(
        name: impl Into<String>,
        workspace: Arc<LocalWorkspace<R>>,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        Self::init(name.into(), workspace, StackInit::CreateOrSelect, cancel).await
    }

    /// Build a workspace from program args, then create and/or select the stack.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::MissingArgument` for an empty name or path,
    /// or any workspace construction or stack error.
    pub async fn from_program_args(
        cmd: PulumiCmd<R>,
        args: impl Into<ProgramArgs>,
        init: StackInit,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let (name, options) = args.into().into_parts()?;
        let workspace = LocalWorkspace::create_with_cmd(cmd, options, cancel).await?;
        Self::init(name, Arc::new(workspace), init, cancel).await
    }

    async fn init(
        name: String,
        workspace: Arc<LocalWorkspace<R>>,
        init: StackInit,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        match init {
            StackInit::Create => workspace.create_stack(&name, cancel).await?,
            StackInit::Select => workspace.select_stack(&name, cancel).await?,
            StackInit::CreateOrSelect => {
                if let Err(e) = workspace.create_stack(&name, cancel).await {
                    if !matches!(
                        e.downcast_ref::<CommandError>(),
                        Some(CommandError::StackAlreadyExists(_))
                    ) {
                        return Err(e);
                    }
                    tracing::debug!(stack = %name, "stack exists, selecting");
                    workspace.select_stack(&name, cancel).await?;
                }
            }
        }
        Ok(Self { name, workspace })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn workspace(&self) -> &Arc<LocalWorkspace<R>> {
        &self.workspace
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::get_config_value`].
    pub async fn get_config_value(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfigValue> {
        self.workspace.get_config_value(&self.name, key, cancel).await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::get_config`].
    pub async fn get_config(
        &self,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        self.workspace.get_config(&self.name, cancel).await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::set_config_value`].
    pub async fn set_config_value(
        &self,
        key: &str,
        value: &ConfigValue,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.workspace
            .set_config_value(&self.name, key, value, cancel)
            .await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::set_config`].
    pub async fn set_config(
        &self,
        config: &BTreeMap<String, ConfigValue>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.workspace.set_config(&self.name, config, cancel).await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::remove_config_value`].
    pub async fn remove_config_value(&self, key: &str, cancel: &CancellationToken) -> Result<()> {
        self.workspace
            .remove_config_value(&self.name, key, cancel)
            .await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::remove_config`].
    pub async fn remove_config(&self, keys: &[&str], cancel: &CancellationToken) -> Result<()> {
        self.workspace.remove_config(&self.name, keys, cancel).await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::refresh_config`].
    pub async fn refresh_config(
        &self,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        self.workspace.refresh_config(&self.name, cancel).await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::stack_settings`].
    pub async fn settings(&self, cancel: &CancellationToken) -> Result<Option<StackSettings>> {
        self.workspace.stack_settings(&self.name, cancel).await
    }

    /// # Errors
    ///
    /// See [`LocalWorkspace::save_stack_settings`].
    pub async fn save_settings(
        &self,
        settings: &StackSettings,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.workspace
            .save_stack_settings(&self.name, settings, cancel)
            .await
    }
}

impl LocalWorkspace<TokioCommandRunner> {
    /// Workspace plus newly created stack, from program args.
    ///
    /// # Errors
    ///
    /// See [`Stack::from_program_args`].
    pub async fn create_stack_from(
        args: impl Into<ProgramArgs>,
        cancel: &CancellationToken,
    ) -> Result<Stack> {
        Stack::from_program_args(default_cmd(), args, StackInit::Create, cancel).await
    }

    /// Workspace plus existing stack, from program args.
    ///
    /// # Errors
    ///
    /// See [`Stack::from_program_args`].
    pub async fn select_stack_from(
        args: impl Into<ProgramArgs>,
        cancel: &CancellationToken,
    ) -> Result<Stack> {
        Stack::from_program_args(default_cmd(), args, StackInit::Select, cancel).await
    }

    /// Workspace plus created-or-selected stack, from program args.
    ///
    /// # Errors
    ///
    /// See [`Stack::from_program_args`].
    pub async fn create_or_select_stack_from(
        args: impl Into<ProgramArgs>,
        cancel: &CancellationToken,
    ) -> Result<Stack> {
        Stack::from_program_args(default_cmd(), args, StackInit::CreateOrSelect, cancel).await
    }
}

fn default_cmd() -> PulumiCmd<TokioCommandRunner> {
    PulumiCmd::new(TokioCommandRunner::new())
}
