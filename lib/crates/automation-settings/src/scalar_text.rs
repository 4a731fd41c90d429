//! Source text of config scalars.
//!
//! The config value decoder only sees numbers and booleans after the format
//! has resolved them, so `1.10` would come back as `1.1` and `0x1F` as `31`.
//! A second pass over the same document reads every config scalar as it was
//! written and puts that text back.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::config_value::StackSettingsConfigValue;

pub(crate) type ConfigMap = BTreeMap<String, StackSettingsConfigValue>;

const CONFIG_KEY: &str = "config";

/// Restore the written text of the config scalars of a JSON document.
pub(crate) fn restore_json(content: &str, config: &mut ConfigMap) -> serde_json::Result<()> {
    let kinds = entry_kinds(config);
    let mut de = serde_json::Deserializer::from_str(content);
    let texts = DocumentTexts::<JsonText>::new(&kinds).deserialize(&mut de)?;
    apply(config, texts);
    Ok(())
}

/// Restore the written text of the config scalars of a YAML document.
pub(crate) fn restore_yaml(content: &str, config: &mut ConfigMap) -> Result<(), serde_yaml::Error> {
    let kinds = entry_kinds(config);
    let texts =
        DocumentTexts::<YamlText>::new(&kinds).deserialize(serde_yaml::Deserializer::from_str(content))?;
    apply(config, texts);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Plain,
    Secure,
    /// Empty or null: nothing to restore.
    Skip,
}

fn entry_kinds(config: &ConfigMap) -> BTreeMap<String, Entry> {
    config
        .iter()
        .map(|(key, value)| {
            let kind = if value.value.is_empty() {
                Entry::Skip
            } else if value.is_secure {
                Entry::Secure
            } else {
                Entry::Plain
            };
            (key.clone(), kind)
        })
        .collect()
}

fn apply(config: &mut ConfigMap, texts: BTreeMap<String, String>) {
    for (key, text) in texts {
        if let Some(value) = config.get_mut(&key) {
            value.value = text;
        }
    }
}

// ── Per-format scalar text ──────────────────────────────────────────────────

trait SourceText: DeserializeOwned {
    fn into_text(self) -> Option<String>;
}

/// YAML hands `deserialize_str` the scalar exactly as written.
struct YamlText(String);

impl<'de> Deserialize<'de> for YamlText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(YamlText)
    }
}

impl SourceText for YamlText {
    fn into_text(self) -> Option<String> {
        Some(self.0)
    }
}

/// Raw JSON token. Strings already decode exactly; numbers and booleans
/// keep their token text.
struct JsonText(Box<RawValue>);

impl<'de> Deserialize<'de> for JsonText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Box::<RawValue>::deserialize(deserializer).map(JsonText)
    }
}

impl SourceText for JsonText {
    fn into_text(self) -> Option<String> {
        let raw = self.0.get();
        if raw.starts_with('"') || raw == "null" {
            None
        } else {
            Some(raw.to_owned())
        }
    }
}

// ── Document walk ───────────────────────────────────────────────────────────

struct DocumentTexts<'a, T> {
    kinds: &'a BTreeMap<String, Entry>,
    text: PhantomData<T>,
}

impl<'a, T> DocumentTexts<'a, T> {
    fn new(kinds: &'a BTreeMap<String, Entry>) -> Self {
        Self {
            kinds,
            text: PhantomData,
        }
    }
}

impl<'de, T: SourceText> DeserializeSeed<'de> for DocumentTexts<'_, T> {
    type Value = BTreeMap<String, String>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, T: SourceText> Visitor<'de> for DocumentTexts<'_, T> {
    type Value = BTreeMap<String, String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a settings document")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut texts = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == CONFIG_KEY {
                texts = map.next_value_seed(ConfigTexts::<T> {
                    kinds: self.kinds,
                    text: PhantomData,
                })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(texts)
    }
}

struct ConfigTexts<'a, T> {
    kinds: &'a BTreeMap<String, Entry>,
    text: PhantomData<T>,
}

impl<'de, T: SourceText> DeserializeSeed<'de> for ConfigTexts<'_, T> {
    type Value = BTreeMap<String, String>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, T: SourceText> Visitor<'de> for ConfigTexts<'_, T> {
    type Value = BTreeMap<String, String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a config mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut texts = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            let text = match self.kinds.get(&key) {
                Some(Entry::Plain) => map.next_value::<T>()?.into_text(),
                Some(Entry::Secure) => map.next_value_seed(SecureText::<T>(PhantomData))?,
                Some(Entry::Skip) | None => {
                    map.next_value::<IgnoredAny>()?;
                    None
                }
            };
            if let Some(text) = text {
                texts.insert(key, text);
            }
        }
        Ok(texts)
    }
}

/// Text inside a single-key `secure` mapping.
struct SecureText<T>(PhantomData<T>);

impl<'de, T: SourceText> DeserializeSeed<'de> for SecureText<T> {
    type Value = Option<String>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, T: SourceText> Visitor<'de> for SecureText<T> {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a secure mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut text = None;
        while map.next_key::<IgnoredAny>()?.is_some() {
            text = map.next_value::<T>()?.into_text();
        }
        Ok(text)
    }
}
