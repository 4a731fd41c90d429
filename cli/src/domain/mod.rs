//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod error;
pub mod stack;

pub use error::{CommandError, CommandFailure, WorkspaceError};
pub use stack::{stack_short_name, validate_stack_name};
