//! Construction inputs for a workspace and the program-args shortcuts that
//! build one together with a stack.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use automation_settings::{ProjectSettings, StackSettings};

use crate::domain::error::WorkspaceError;

/// An inline program. The workspace stores it for callers that drive
/// deployments; config and stack management never invoke it.
pub type PulumiFn = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Everything a workspace can be constructed with. All fields are optional.
#[derive(Clone, Default)]
pub struct LocalWorkspaceOptions {
    /// Directory holding the settings files. A fresh temporary directory,
    /// removed on teardown, is used when unset.
    pub work_dir: Option<PathBuf>,
    /// Exported to every CLI invocation as `PULUMI_HOME`.
    pub pulumi_home: Option<PathBuf>,
    pub program: Option<PulumiFn>,
    /// Passed to `stack init --secrets-provider`.
    pub secrets_provider: Option<String>,
    /// Layered over the inherited environment of every CLI invocation.
    pub environment_variables: HashMap<String, String>,
    /// Written to the work directory during initialization.
    pub project_settings: Option<ProjectSettings>,
    /// Written to the work directory during initialization, keyed by stack name.
    pub stack_settings: BTreeMap<String, StackSettings>,
}

impl fmt::Debug for LocalWorkspaceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWorkspaceOptions")
            .field("work_dir", &self.work_dir)
            .field("pulumi_home", &self.pulumi_home)
            .field("program", &self.program.as_ref().map(|_| "<fn>"))
            .field("secrets_provider", &self.secrets_provider)
            .field(
                "environment_variables",
                &self.environment_variables.keys().collect::<Vec<_>>(),
            )
            .field("project_settings", &self.project_settings)
            .field("stack_settings", &self.stack_settings.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A stack of a project that already lives on disk.
#[derive(Debug, Clone)]
pub struct LocalProgramArgs {
    pub stack_name: String,
    pub work_dir: PathBuf,
    pub options: LocalWorkspaceOptions,
}

impl LocalProgramArgs {
    #[must_use]
    pub fn new(stack_name: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            stack_name: stack_name.into(),
            work_dir: work_dir.into(),
            options: LocalWorkspaceOptions::default(),
        }
    }
}

/// A stack of a project whose program is a closure.
#[derive(Clone)]
pub struct InlineProgramArgs {
    pub project_name: String,
    pub stack_name: String,
    pub program: PulumiFn,
    pub options: LocalWorkspaceOptions,
}

impl InlineProgramArgs {
    #[must_use]
    pub fn new(
        project_name: impl Into<String>,
        stack_name: impl Into<String>,
        program: PulumiFn,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            stack_name: stack_name.into(),
            program,
            options: LocalWorkspaceOptions::default(),
        }
    }
}

impl fmt::Debug for InlineProgramArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineProgramArgs")
            .field("project_name", &self.project_name)
            .field("stack_name", &self.stack_name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Either flavour of program args.
#[derive(Debug, Clone)]
pub enum ProgramArgs {
    Local(LocalProgramArgs),
    Inline(InlineProgramArgs),
}

impl From<LocalProgramArgs> for ProgramArgs {
    fn from(args: LocalProgramArgs) -> Self {
        Self::Local(args)
    }
}

impl From<InlineProgramArgs> for ProgramArgs {
    fn from(args: InlineProgramArgs) -> Self {
        Self::Inline(args)
    }
}

impl ProgramArgs {
    /// Split into the stack name and the workspace options to build with.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::MissingArgument` if a required name or path
    /// is empty.
    pub fn into_parts(self) -> Result<(String, LocalWorkspaceOptions)> {
        match self {
            Self::Local(args) => {
                require(&args.stack_name, "stack_name")?;
                if args.work_dir.as_os_str().is_empty() {
                    return Err(WorkspaceError::MissingArgument("work_dir").into());
                }
                let mut options = args.options;
                options.work_dir = Some(args.work_dir);
                Ok((args.stack_name, options))
            }
            Self::Inline(args) => {
                require(&args.project_name, "project_name")?;
                require(&args.stack_name, "stack_name")?;
                let mut options = args.options;
                options.program = Some(args.program);
                if options.project_settings.is_none() {
                    options.project_settings =
                        Some(ProjectSettings::default_for(args.project_name));
                }
                Ok((args.stack_name, options))
            }
        }
    }
}

fn require(value: &str, name: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WorkspaceError::MissingArgument(name).into());
    }
    Ok(())
}
