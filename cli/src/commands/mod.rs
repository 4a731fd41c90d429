//! Command implementations

pub mod config;
pub mod plugin;
pub mod project;
pub mod stack;
pub mod whoami;

use clap::Args;

/// Stack a stack-scoped command operates on.
#[derive(Args, Debug, Clone)]
pub struct StackArg {
    /// Stack name, optionally qualified as `org/project/stack`
    #[arg(long, short)]
    pub stack: String,
}
