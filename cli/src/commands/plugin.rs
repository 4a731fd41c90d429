//! `pulumi-auto plugin`: manage CLI plugins.

use anyhow::Result;
use automation_settings::PluginKind;
use clap::Subcommand;

use crate::app::AppContext;

/// Plugin subcommands.
#[derive(Subcommand)]
pub enum PluginCommand {
    /// List installed plugins
    Ls,
    /// Install a plugin
    Install {
        /// Plugin name, e.g. `aws`
        name: String,
        /// Exact version, e.g. `6.0.0`
        version: String,
        #[arg(long, value_enum, default_value_t = PluginKind::Resource)]
        kind: PluginKind,
    },
    /// Remove plugins, optionally narrowed by name and version range
    Rm {
        /// Plugin name
        name: Option<String>,
        /// Semver range, e.g. `<6.0.0`
        version_range: Option<String>,
        #[arg(long, value_enum, default_value_t = PluginKind::Resource)]
        kind: PluginKind,
    },
}

/// Run the plugin command.
///
/// # Errors
///
/// Returns an error if the CLI fails.
pub async fn run(app: &AppContext, cmd: PluginCommand) -> Result<()> {
    let workspace = app.workspace().await?;
    match cmd {
        PluginCommand::Ls => {
            let plugins = workspace.list_plugins(&app.cancel).await?;
            app.renderer().render_plugins(&plugins)
        }
        PluginCommand::Install {
            name,
            version,
            kind,
        } => {
            workspace
                .install_plugin(&name, &version, kind, &app.cancel)
                .await?;
            app.output
                .success(&format!("Installed {kind} plugin {name} v{version}"));
            Ok(())
        }
        PluginCommand::Rm {
            name,
            version_range,
            kind,
        } => {
            let target = match (&name, &version_range) {
                (Some(n), Some(r)) => format!("{kind} plugin {n} {r}"),
                (Some(n), None) => format!("all versions of {kind} plugin {n}"),
                _ => format!("all {kind} plugins"),
            };
            if !app.confirm(&format!("Remove {target}?"), true)? {
                println!("Cancelled.");
                return Ok(());
            }
            workspace
                .remove_plugin(name.as_deref(), version_range.as_deref(), kind, &app.cancel)
                .await?;
            app.output.success(&format!("Removed {target}"));
            Ok(())
        }
    }
}
