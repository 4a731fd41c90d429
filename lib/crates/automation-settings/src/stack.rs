//! Stack settings (`Pulumi.<stack>.yaml` / `.yml` / `.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config_value::StackSettingsConfigValue;
use crate::format::SettingsDocument;

/// Settings of a single stack: secrets-provider metadata and config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackSettings {
    #[serde(
        rename = "secretsprovider",
        alias = "secretsProvider",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub secrets_provider: Option<String>,

    #[serde(
        rename = "encryptedkey",
        alias = "encryptedKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub encrypted_key: Option<String>,

    #[serde(
        rename = "encryptionsalt",
        alias = "encryptionSalt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub encryption_salt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, StackSettingsConfigValue>>,
}

impl SettingsDocument for StackSettings {
    fn config_mut(&mut self) -> Option<&mut BTreeMap<String, StackSettingsConfigValue>> {
        self.config.as_mut()
    }
}
