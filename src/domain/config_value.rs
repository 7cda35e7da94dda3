// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic configuration value tree.
//!
//! This module provides [`ConfigValue`], a tagged value tree that holds an
//! arbitrary JSON-shaped configuration while it travels through the
//! deploy/download pipeline.

use crate::domain::errors::{ProfileError, Result};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

/// A keyed mapping of configuration values.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A configuration value of any shape.
///
/// # Examples
///
/// ```
/// use profile_sync::domain::ConfigValue;
///
/// let value: ConfigValue = serde_json::from_str(r#"{"port": 8080, "tags": ["a", "b"]}"#).unwrap();
/// let map = value.into_mapping().unwrap();
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// An absent value (`null`).
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or floating point number.
    Number(Number),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<ConfigValue>),
    /// A keyed mapping of values.
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// Returns the name of this value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
        }
    }

    /// Returns the inner mapping, or a `ShapeMismatch` error for any other shape.
    pub fn into_mapping(self) -> Result<ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(ProfileError::ShapeMismatch {
                expected: "mapping",
                found: other.kind_name(),
            }),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => ConfigValue::Number(n),
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(Number::from(n))
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<ConfigValue, E> {
        Number::from_f64(v)
            .map(ConfigValue::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {}", v)))
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_unit<E>(self) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_none<E>(self) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<ConfigValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<ConfigValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ConfigValue::Sequence(items))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<ConfigValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = ConfigMap::new();
        while let Some((key, value)) = access.next_entry::<String, ConfigValue>()? {
            map.insert(key, value);
        }
        Ok(ConfigValue::Mapping(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_object() {
        let value: ConfigValue =
            serde_json::from_str(r#"{"a": {"b": [1, 2]}, "c": true, "d": null}"#).unwrap();
        let map = value.into_mapping().unwrap();
        assert_eq!(map["c"], ConfigValue::Bool(true));
        assert_eq!(map["d"], ConfigValue::Null);
        let inner = map["a"].clone().into_mapping().unwrap();
        assert_eq!(
            inner["b"],
            ConfigValue::Sequence(vec![ConfigValue::from(1_i64), ConfigValue::from(2_i64)])
        );
    }

    #[test]
    fn test_deserialize_matches_json_value_conversion() {
        let text = r#"{"name": "svc", "ratio": 0.5, "big": 18446744073709551615, "list": []}"#;
        let direct: ConfigValue = serde_json::from_str(text).unwrap();
        let via_value = ConfigValue::from(serde_json::from_str::<serde_json::Value>(text).unwrap());
        assert_eq!(direct, via_value);
    }

    #[test]
    fn test_into_mapping_rejects_sequence() {
        let value = ConfigValue::from(json!([1, 2, 3]));
        let err = value.into_mapping().unwrap_err();
        assert!(matches!(
            err,
            ProfileError::ShapeMismatch {
                expected: "mapping",
                found: "sequence"
            }
        ));
    }

    #[test]
    fn test_into_mapping_rejects_scalar() {
        let err = ConfigValue::from("text").into_mapping().unwrap_err();
        assert_eq!(err.kind(), "shape_mismatch");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ConfigValue::Null.kind_name(), "null");
        assert_eq!(ConfigValue::from(true).kind_name(), "boolean");
        assert_eq!(ConfigValue::from(3_i64).kind_name(), "number");
        assert_eq!(ConfigValue::Mapping(ConfigMap::new()).kind_name(), "mapping");
    }
}
