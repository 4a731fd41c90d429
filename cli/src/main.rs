//! pulumi-auto - drive Pulumi projects and stacks from the command line

use std::process::ExitCode;

use clap::Parser;
use pulumi_automation::cli::Cli;
use pulumi_automation::domain::{CommandError, WorkspaceError};
use pulumi_automation::output::json::format_error;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    match cli.run(cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                match format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Stable code for the `--json` error object.
fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(err) = e.downcast_ref::<CommandError>() {
        return match err {
            CommandError::StackAlreadyExists(_) => "STACK_ALREADY_EXISTS",
            CommandError::StackNotFound(_) => "STACK_NOT_FOUND",
            CommandError::ConcurrentUpdate(_) => "CONCURRENT_UPDATE",
            CommandError::Failed(_) => "COMMAND_FAILED",
        };
    }
    if let Some(err) = e.downcast_ref::<WorkspaceError>() {
        return match err {
            WorkspaceError::NotReady => "NOT_READY",
            WorkspaceError::InvalidStackName(_) => "INVALID_STACK_NAME",
            WorkspaceError::MissingArgument(_) => "MISSING_ARGUMENT",
            WorkspaceError::Cancelled => "CANCELLED",
        };
    }
    if e.downcast_ref::<automation_settings::SettingsError>().is_some() {
        return "INVALID_SETTINGS";
    }
    "ERROR"
}
