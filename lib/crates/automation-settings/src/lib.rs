//! Settings model shared by the automation CLI and library.
//!
//! Pure data: no I/O, no async. Everything here can be decoded from and
//! encoded to the two settings-file formats (`SettingsFormat`).

pub mod config_value;
pub mod error;
pub mod format;
pub mod project;
pub mod runtime;
mod scalar_text;
pub mod stack;
pub mod wire;

pub use config_value::StackSettingsConfigValue;
pub use error::{Result, SettingsError};
pub use format::{SettingsDocument, SettingsFormat};
pub use project::{ProjectBackend, ProjectSettings, ProjectTemplate, ProjectTemplateConfigValue};
pub use runtime::{ProjectRuntime, ProjectRuntimeName, ProjectRuntimeOptions};
pub use stack::StackSettings;
pub use wire::{ConfigValue, PluginInfo, PluginKind, StackSummary, WhoAmIResult};
