//! Application layer: port traits and the workspace/stack façade.
//!
//! Imports from `crate::domain` are allowed. Concrete I/O lives in
//! `crate::infra` and is reached only through the port traits, except for
//! the default runner and settings store the factories wire in.

pub mod options;
pub mod ports;
pub mod stack;
pub mod workspace;

pub use options::{InlineProgramArgs, LocalProgramArgs, LocalWorkspaceOptions, ProgramArgs, PulumiFn};
pub use ports::{CommandContext, CommandHook, CommandRunner, NoopHook, SettingsStore};
pub use stack::{Stack, StackInit};
pub use workspace::LocalWorkspace;
