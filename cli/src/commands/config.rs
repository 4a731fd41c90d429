//! `pulumi-auto config`: read and change a stack's config through the CLI.

use std::collections::BTreeMap;

use anyhow::Result;
use automation_settings::ConfigValue;
use clap::Subcommand;

use crate::app::AppContext;
use crate::commands::StackArg;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show one config value
    Get {
        #[command(flatten)]
        stack: StackArg,
        /// Config key, e.g. `aws:region`
        key: String,
        /// Print secret values in clear text
        #[arg(long)]
        show_secrets: bool,
    },
    /// Set one config value
    Set {
        #[command(flatten)]
        stack: StackArg,
        key: String,
        value: String,
        /// Encrypt the value
        #[arg(long)]
        secret: bool,
    },
    /// Set several config values, one `KEY=VALUE` per flag
    SetAll {
        #[command(flatten)]
        stack: StackArg,
        /// Plaintext entry
        #[arg(long = "plaintext", value_name = "KEY=VALUE")]
        plaintext: Vec<String>,
        /// Secret entry
        #[arg(long = "secret", value_name = "KEY=VALUE")]
        secret: Vec<String>,
    },
    /// Remove config values
    Rm {
        #[command(flatten)]
        stack: StackArg,
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Replace local config with the config of the last deployment
    Refresh {
        #[command(flatten)]
        stack: StackArg,
    },
    /// Show all config values
    Show {
        #[command(flatten)]
        stack: StackArg,
        /// Print secret values in clear text
        #[arg(long)]
        show_secrets: bool,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if an entry is malformed or the CLI fails.
pub async fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Get {
            stack,
            key,
            show_secrets,
        } => {
            let workspace = app.workspace().await?;
            let value = workspace
                .get_config_value(&stack.stack, &key, &app.cancel)
                .await?;
            app.renderer().render_config_value(&value, show_secrets)
        }
        ConfigCommand::Set {
            stack,
            key,
            value,
            secret,
        } => {
            let workspace = app.workspace().await?;
            let value = ConfigValue::new(value, secret);
            workspace
                .set_config_value(&stack.stack, &key, &value, &app.cancel)
                .await?;
            app.output.success(&format!("Set {key} on {}", stack.stack));
            Ok(())
        }
        ConfigCommand::SetAll {
            stack,
            plaintext,
            secret,
        } => {
            let config = parse_entries(&plaintext, &secret)?;
            if config.is_empty() {
                anyhow::bail!("Nothing to set. Pass --plaintext KEY=VALUE or --secret KEY=VALUE.");
            }
            let workspace = app.workspace().await?;
            workspace
                .set_config(&stack.stack, &config, &app.cancel)
                .await?;
            app.output
                .success(&format!("Set {} values on {}", config.len(), stack.stack));
            Ok(())
        }
        ConfigCommand::Rm { stack, keys } => {
            let workspace = app.workspace().await?;
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            workspace
                .remove_config(&stack.stack, &keys, &app.cancel)
                .await?;
            app.output
                .success(&format!("Removed {} from {}", keys.join(", "), stack.stack));
            Ok(())
        }
        ConfigCommand::Refresh { stack } => {
            let workspace = app.workspace().await?;
            let config = workspace.refresh_config(&stack.stack, &app.cancel).await?;
            app.renderer().render_config(&config, false)
        }
        ConfigCommand::Show {
            stack,
            show_secrets,
        } => {
            let workspace = app.workspace().await?;
            let config = workspace.get_config(&stack.stack, &app.cancel).await?;
            app.renderer().render_config(&config, show_secrets)
        }
    }
}

/// Build the bulk-set map. A key given twice keeps the last value.
///
/// # Errors
///
/// Returns an error if an entry has no `=` or an empty key.
pub fn parse_entries(plaintext: &[String], secret: &[String]) -> Result<BTreeMap<String, ConfigValue>> {
    let mut config = BTreeMap::new();
    for (entries, is_secret) in [(plaintext, false), (secret, true)] {
        for entry in entries {
            let Some((key, value)) = entry.split_once('=') else {
                anyhow::bail!("Invalid entry '{entry}': expected KEY=VALUE");
            };
            if key.trim().is_empty() {
                anyhow::bail!("Invalid entry '{entry}': empty key");
            }
            config.insert(key.to_string(), ConfigValue::new(value, is_secret));
        }
    }
    Ok(config)
}
