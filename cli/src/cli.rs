//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags, WorkspaceFlags};
use crate::commands;
use crate::infra::pulumi_cmd::PULUMI_BIN;

/// Drive Pulumi projects and stacks from settings files and the Pulumi CLI
#[derive(Parser)]
#[command(
    name = "pulumi-auto",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer yes to every prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Directory holding Pulumi.yaml and the stack settings files
    #[arg(long, global = true, env = "PULUMI_AUTOMATION_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Pulumi home directory passed to the CLI
    #[arg(long, global = true, env = "PULUMI_HOME")]
    pub pulumi_home: Option<PathBuf>,

    /// Secrets provider for new stacks, e.g. `passphrase`
    #[arg(long, global = true)]
    pub secrets_provider: Option<String>,

    /// Pulumi CLI to run
    #[arg(long, global = true, default_value = PULUMI_BIN)]
    pub pulumi_bin: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage the project settings file
    #[command(subcommand)]
    Project(commands::project::ProjectCommand),

    /// Manage stacks
    #[command(subcommand)]
    Stack(commands::stack::StackCommand),

    /// Manage stack configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Manage plugins
    #[command(subcommand)]
    Plugin(commands::plugin::PluginCommand),

    /// Show the logged-in user
    Whoami,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            work_dir,
            pulumi_home,
            secrets_provider,
            pulumi_bin,
            command,
        } = self;

        let app = AppContext::new(
            AppFlags {
                output: OutputFlags {
                    no_color,
                    quiet,
                    json,
                },
                behaviour: BehaviourFlags { yes },
                workspace: WorkspaceFlags {
                    work_dir,
                    pulumi_home,
                    secrets_provider,
                    pulumi_bin,
                },
            },
            cancel,
        );

        match command {
            Command::Project(cmd) => commands::project::run(&app, cmd).await,
            Command::Stack(cmd) => commands::stack::run(&app, cmd).await,
            Command::Config(cmd) => commands::config::run(&app, cmd).await,
            Command::Plugin(cmd) => commands::plugin::run(&app, cmd).await,
            Command::Whoami => commands::whoami::run(&app).await,
        }
    }
}
