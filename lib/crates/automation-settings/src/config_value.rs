//! Stack configuration values as they appear inside settings files.
//!
//! A plain value is a bare scalar. A secure value is a mapping with exactly
//! one key, `secure`, whose value is a scalar. Every other shape is rejected
//! so that a hand-edited file never loses data silently.
//!
//! Decoding a whole settings document through `SettingsFormat::decode` also
//! keeps the written text of numeric and boolean scalars (`1.10`, `0x1F`).

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Key that marks a value as secure.
pub const SECURE_KEY: &str = "secure";

/// Message carried by every rejected config value shape.
pub const COMPLEX_VALUE_MESSAGE: &str =
    "complex objects are not supported for stack configuration values";

/// One entry of a settings file's `config` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettingsConfigValue {
    pub value: String,
    pub is_secure: bool,
}

impl StackSettingsConfigValue {
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_secure: false,
        }
    }

    #[must_use]
    pub fn secure(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_secure: true,
        }
    }
}

impl Serialize for StackSettingsConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_secure {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(SECURE_KEY, &self.value)?;
            map.end()
        } else {
            serializer.serialize_str(&self.value)
        }
    }
}

impl<'de> Deserialize<'de> for StackSettingsConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

fn complex<E: de::Error>() -> E {
    E::custom(COMPLEX_VALUE_MESSAGE)
}

/// Text of a scalar node. Mappings and sequences are rejected.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor).map(Scalar)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    // `key:` with nothing after it, or JSON `null`.
    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<String, A::Error> {
        Err(complex())
    }

    fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<String, A::Error> {
        Err(complex())
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = StackSettingsConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a plain scalar or a single-key `secure` mapping")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        ScalarVisitor.visit_str(v).map(StackSettingsConfigValue::plain)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(StackSettingsConfigValue::plain(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        ScalarVisitor.visit_bool(v).map(StackSettingsConfigValue::plain)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        ScalarVisitor.visit_i64(v).map(StackSettingsConfigValue::plain)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        ScalarVisitor.visit_u64(v).map(StackSettingsConfigValue::plain)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        ScalarVisitor.visit_f64(v).map(StackSettingsConfigValue::plain)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        ScalarVisitor.visit_unit().map(StackSettingsConfigValue::plain)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        ScalarVisitor.visit_none().map(StackSettingsConfigValue::plain)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(complex())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some(Scalar(key)) = map.next_key::<Scalar>()? else {
            return Err(complex());
        };
        if !key.eq_ignore_ascii_case(SECURE_KEY) {
            return Err(complex());
        }
        let Scalar(value) = map.next_value::<Scalar>()?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(complex());
        }
        Ok(StackSettingsConfigValue::secure(value))
    }
}
