//! Project runtime: either a bare identifier or `{ name, options }`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language runtime a project's program is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ProjectRuntimeName {
    #[default]
    #[cfg_attr(feature = "clap", value(name = "nodejs"))]
    NodeJs,
    Go,
    Python,
    #[cfg_attr(feature = "clap", value(name = "dotnet"))]
    DotNet,
}

impl ProjectRuntimeName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeJs => "nodejs",
            Self::Go => "go",
            Self::Python => "python",
            Self::DotNet => "dotnet",
        }
    }
}

impl std::fmt::Display for ProjectRuntimeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime-specific options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectRuntimeOptions {
    /// Node.js only: whether to compile TypeScript on the fly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typescript: Option<bool>,
    /// Go and .NET: path to a prebuilt binary to run instead of building.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    /// Python only: virtual environment directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtualenv: Option<String>,
}

/// Runtime of a project.
///
/// Written as the bare runtime name when `options` is `None`, and as a
/// `{ name, options }` mapping otherwise. Both forms are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectRuntime {
    pub name: ProjectRuntimeName,
    pub options: Option<ProjectRuntimeOptions>,
}

impl ProjectRuntime {
    #[must_use]
    pub fn new(name: ProjectRuntimeName) -> Self {
        Self { name, options: None }
    }

    #[must_use]
    pub fn with_options(name: ProjectRuntimeName, options: ProjectRuntimeOptions) -> Self {
        Self {
            name,
            options: Some(options),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RuntimeRepr {
    Bare(ProjectRuntimeName),
    Full {
        name: ProjectRuntimeName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<ProjectRuntimeOptions>,
    },
}

impl Serialize for ProjectRuntime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match &self.options {
            None => RuntimeRepr::Bare(self.name),
            Some(options) => RuntimeRepr::Full {
                name: self.name,
                options: Some(options.clone()),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProjectRuntime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RuntimeRepr::deserialize(deserializer)? {
            RuntimeRepr::Bare(name) => Self::new(name),
            RuntimeRepr::Full { name, options } => Self { name, options },
        })
    }
}
