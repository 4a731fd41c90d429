//! Whole-document encoding for the two settings-file formats.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config_value::StackSettingsConfigValue;
use crate::error::{Result, SettingsError};
use crate::scalar_text;

/// A settings file document with a `config` block.
pub trait SettingsDocument: DeserializeOwned {
    fn config_mut(&mut self) -> Option<&mut BTreeMap<String, StackSettingsConfigValue>>;
}

/// Markup format of a settings file, chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsFormat {
    Yaml,
    Json,
}

impl SettingsFormat {
    /// `json` selects JSON; every other recognized extension is YAML.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        if ext.trim_start_matches('.').eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    /// Decode a full settings document.
    ///
    /// An empty YAML document decodes as an empty mapping. Config scalars
    /// keep the text they were written with.
    pub fn decode<T: SettingsDocument>(self, content: &str) -> Result<T> {
        let mut document: T = match self {
            Self::Json => serde_json::from_str(content).map_err(|e| self.decode_error(e))?,
            Self::Yaml if content.trim().is_empty() => {
                serde_yaml::from_str("{}").map_err(|e| self.decode_error(e))?
            }
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| self.decode_error(e))?,
        };
        if let Some(config) = document.config_mut().filter(|c| !c.is_empty()) {
            match self {
                Self::Json => scalar_text::restore_json(content, config)
                    .map_err(|e| self.decode_error(e))?,
                Self::Yaml => scalar_text::restore_yaml(content, config)
                    .map_err(|e| self.decode_error(e))?,
            }
        }
        Ok(document)
    }

    /// Encode a full settings document. JSON output is pretty-printed.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<String> {
        let encoded = match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        };
        encoded.map_err(|message| SettingsError::Encode {
            format: self,
            message,
        })
    }

    fn decode_error(self, err: impl fmt::Display) -> SettingsError {
        SettingsError::Decode {
            format: self,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SettingsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("YAML"),
            Self::Json => f.write_str("JSON"),
        }
    }
}
