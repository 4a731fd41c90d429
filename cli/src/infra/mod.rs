//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution and
//! settings-file access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod pulumi_cmd;
pub mod settings_store;

pub use command_runner::TokioCommandRunner;
pub use pulumi_cmd::{CommandResult, PULUMI_BIN, PulumiCmd};
pub use settings_store::LocalSettingsStore;
