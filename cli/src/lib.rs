//! Local automation over the Pulumi CLI: project and stack settings files,
//! stack config, stacks and plugins.
//!
//! The library is usable on its own through [`application::LocalWorkspace`]
//! and [`application::Stack`]; the `pulumi-auto` binary is a thin driver
//! over it.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;

pub use application::{LocalWorkspace, LocalWorkspaceOptions, Stack};
