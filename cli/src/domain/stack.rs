//! Stack names and the settings files derived from them.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use automation_settings::SettingsFormat;
use regex::Regex;

use crate::domain::error::WorkspaceError;

/// Extensions tried, in priority order, when locating a settings file.
pub const SETTINGS_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Extension used when no settings file exists yet.
pub const DEFAULT_SETTINGS_EXTENSION: &str = "yaml";

/// File stem of the project settings file.
pub const PROJECT_SETTINGS_STEM: &str = "Pulumi";

/// One segment of a qualified stack name.
static STACK_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid regex")
});

/// Trailing `/`-separated segment of a possibly qualified stack name.
///
/// `org/proj/dev` → `dev`; `dev` → `dev`.
#[must_use]
pub fn stack_short_name(stack_name: &str) -> &str {
    stack_name.rsplit('/').next().unwrap_or(stack_name)
}

/// File stem of a stack's settings file: `Pulumi.<short name>`.
#[must_use]
pub fn stack_settings_stem(stack_name: &str) -> String {
    format!("{PROJECT_SETTINGS_STEM}.{}", stack_short_name(stack_name))
}

/// `<stem>.<ext>`.
#[must_use]
pub fn settings_file_name(stem: &str, ext: &str) -> String {
    format!("{stem}.{ext}")
}

/// Format used for a settings file with the given extension.
#[must_use]
pub fn settings_format(ext: &str) -> SettingsFormat {
    SettingsFormat::from_extension(ext)
}

/// Validates a stack name: one to three `/`-separated segments, each made of
/// `[A-Za-z0-9_.-]`.
///
/// # Errors
///
/// Returns `WorkspaceError::InvalidStackName` if the name does not match.
pub fn validate_stack_name(stack_name: &str) -> Result<()> {
    let segments: Vec<&str> = stack_name.split('/').collect();
    let valid = (1..=3).contains(&segments.len())
        && segments.iter().all(|s| STACK_SEGMENT_RE.is_match(s));
    if !valid {
        return Err(WorkspaceError::InvalidStackName(stack_name.to_string()).into());
    }
    Ok(())
}
