//! `pulumi-auto stack`: list, create, select and remove stacks.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;

/// Stack subcommands.
#[derive(Subcommand)]
pub enum StackCommand {
    /// List stacks of the project
    Ls,
    /// Create a stack and select it
    Init {
        /// Stack name, optionally qualified as `org/project/stack`
        name: String,
    },
    /// Select a stack
    Select {
        /// Stack name
        name: String,
    },
    /// Remove a stack and its configuration
    Rm {
        /// Stack name
        name: String,
    },
    /// Show a stack's settings file
    Settings {
        /// Stack name
        name: String,
    },
}

/// Run the stack command.
///
/// # Errors
///
/// Returns an error if the CLI fails or the settings file cannot be read.
pub async fn run(app: &AppContext, cmd: StackCommand) -> Result<()> {
    match cmd {
        StackCommand::Ls => {
            let workspace = app.workspace().await?;
            let stacks = workspace.list_stacks(&app.cancel).await?;
            app.renderer().render_stacks(&stacks)
        }
        StackCommand::Init { name } => {
            let workspace = app.workspace().await?;
            workspace.create_stack(&name, &app.cancel).await?;
            app.output.success(&format!("Created stack {name}"));
            Ok(())
        }
        StackCommand::Select { name } => {
            let workspace = app.workspace().await?;
            workspace.select_stack(&name, &app.cancel).await?;
            app.output.success(&format!("Selected stack {name}"));
            Ok(())
        }
        StackCommand::Rm { name } => remove(app, &name).await,
        StackCommand::Settings { name } => settings(app, &name).await,
    }
}

async fn remove(app: &AppContext, name: &str) -> Result<()> {
    if !app.output.quiet && !app.non_interactive {
        println!();
        println!("This will remove stack {name} and all of its configuration.");
        println!();
    }
    if !app.confirm("Continue?", true)? {
        println!("Cancelled.");
        return Ok(());
    }
    let workspace = app.workspace().await?;
    workspace.remove_stack(name, &app.cancel).await?;
    app.output.success(&format!("Removed stack {name}"));
    Ok(())
}

async fn settings(app: &AppContext, name: &str) -> Result<()> {
    let workspace = app.workspace().await?;
    let settings = workspace.stack_settings(name, &app.cancel).await?;
    if settings.is_none() && !app.is_json() {
        app.output
            .info(&format!("No settings file for stack {name} yet."));
        return Ok(());
    }
    let settings = settings.unwrap_or_default();
    app.renderer().render_stack_settings(name, &settings)
}

