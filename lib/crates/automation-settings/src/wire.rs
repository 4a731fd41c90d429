//! JSON shapes printed by the CLI's `--json` output.
//!
//! These are never written to settings files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A config value as reported by `config get --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub value: String,
    #[serde(rename = "secret", default)]
    pub is_secret: bool,
}

impl ConfigValue {
    #[must_use]
    pub fn new(value: impl Into<String>, is_secret: bool) -> Self {
        Self {
            value: value.into(),
            is_secret,
        }
    }

    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(value, false)
    }

    #[must_use]
    pub fn secret(value: impl Into<String>) -> Self {
        Self::new(value, true)
    }
}

/// One row of `stack ls --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSummary {
    pub name: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_in_progress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Kind of plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Analyzer,
    Language,
    #[default]
    Resource,
}

impl PluginKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyzer => "analyzer",
            Self::Language => "language",
            Self::Resource => "resource",
        }
    }
}

impl std::fmt::Display for PluginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `plugin ls --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub kind: PluginKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_time: Option<DateTime<Utc>>,
    #[serde(rename = "serverURL", default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

/// Result of `whoami`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResult {
    pub user: String,
}
