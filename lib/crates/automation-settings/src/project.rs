//! Project settings (`Pulumi.yaml` / `Pulumi.yml` / `Pulumi.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config_value::StackSettingsConfigValue;
use crate::error::{Result, SettingsError};
use crate::format::SettingsDocument;
use crate::runtime::{ProjectRuntime, ProjectRuntimeName};

/// Settings of a single project. One per workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub name: String,
    /// Missing `runtime` on read falls back to the default runtime.
    #[serde(default)]
    pub runtime: ProjectRuntime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, StackSettingsConfigValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<ProjectTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<ProjectBackend>,
}

impl SettingsDocument for ProjectSettings {
    fn config_mut(&mut self) -> Option<&mut BTreeMap<String, StackSettingsConfigValue>> {
        self.config.as_mut()
    }
}

impl ProjectSettings {
    #[must_use]
    pub fn new(name: impl Into<String>, runtime: ProjectRuntime) -> Self {
        Self {
            name: name.into(),
            runtime,
            main: None,
            description: None,
            author: None,
            website: None,
            license: None,
            config: None,
            template: None,
            backend: None,
        }
    }

    /// Settings used when a caller creates a stack without supplying any:
    /// the given name, the default runtime, nothing else.
    #[must_use]
    pub fn default_for(name: impl Into<String>) -> Self {
        Self::new(name, ProjectRuntime::new(ProjectRuntimeName::default()))
    }

    /// Rejects settings that cannot be persisted.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SettingsError::MissingField("name"));
        }
        Ok(())
    }
}

/// Template metadata used by `pulumi new`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quickstart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, ProjectTemplateConfigValue>>,
}

/// A config prompt declared by a template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectTemplateConfigValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<bool>,
}

/// State backend override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectBackend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
