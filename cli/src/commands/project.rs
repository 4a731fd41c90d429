//! `pulumi-auto project`: show and create the project settings file.

use anyhow::Result;
use automation_settings::{ProjectRuntime, ProjectRuntimeName, ProjectSettings};
use clap::Subcommand;

use crate::app::AppContext;

/// Project subcommands.
#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Show the project settings
    Show,
    /// Write a new project settings file
    Init {
        /// Project name
        name: String,
        /// Language runtime of the program
        #[arg(long, value_enum, default_value_t = ProjectRuntimeName::NodeJs)]
        runtime: ProjectRuntimeName,
        /// Project description
        #[arg(long)]
        description: Option<String>,
        /// Replace existing project settings
        #[arg(long)]
        force: bool,
    },
}

/// Run the project command.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written.
pub async fn run(app: &AppContext, cmd: ProjectCommand) -> Result<()> {
    match cmd {
        ProjectCommand::Show => show(app).await,
        ProjectCommand::Init {
            name,
            runtime,
            description,
            force,
        } => init(app, name, runtime, description, force).await,
    }
}

async fn show(app: &AppContext) -> Result<()> {
    let workspace = app.workspace().await?;
    let Some(project) = workspace.project_settings(&app.cancel).await? else {
        anyhow::bail!(
            "No project settings found in {}. Create one: pulumi-auto project init <name>",
            workspace.work_dir().display()
        );
    };
    app.renderer().render_project(&project)
}

async fn init(
    app: &AppContext,
    name: String,
    runtime: ProjectRuntimeName,
    description: Option<String>,
    force: bool,
) -> Result<()> {
    let workspace = app.workspace().await?;
    let existing = workspace.project_settings(&app.cancel).await?.is_some();
    if existing && !force {
        anyhow::bail!("Project settings already exist. Use --force to replace them.");
    }
    if existing && !app.is_json() {
        app.output.warn("Replacing existing project settings.");
    }

    let mut project = ProjectSettings::new(name, ProjectRuntime::new(runtime));
    project.description = description;
    workspace.save_project_settings(&project, &app.cancel).await?;

    if app.is_json() {
        return app.renderer().render_project(&project);
    }
    app.output.success(&format!(
        "Project '{}' ({runtime}) saved in {}",
        project.name,
        workspace.work_dir().display()
    ));
    Ok(())
}
