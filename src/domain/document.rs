// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML profile documents.
//!
//! A [`ProfileDocument`] is the canonical, persisted form of a configuration:
//! a TOML table tree. Conversion from a [`ConfigMap`] rejects anything TOML
//! cannot hold (null, integers above `i64::MAX`, sequences mixing element
//! kinds) instead of dropping it.

use crate::domain::config_value::{ConfigMap, ConfigValue};
use crate::domain::errors::{ProfileError, Result};
use serde_json::Number;
use toml::{Table, Value};

/// A configuration profile in TOML tree form.
///
/// # Examples
///
/// ```
/// use profile_sync::domain::{ConfigValue, ProfileDocument};
///
/// let value: ConfigValue =
///     serde_json::from_str(r#"{"Writable": {"LogLevel": "INFO"}}"#).unwrap();
/// let document = ProfileDocument::from_map(&value.into_mapping().unwrap()).unwrap();
/// let text = document.to_toml_string().unwrap();
/// assert!(text.contains("[Writable]"));
/// assert!(text.contains("LogLevel = \"INFO\""));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileDocument {
    table: Table,
}

impl ProfileDocument {
    /// Converts a keyed mapping into a TOML document.
    ///
    /// Fails with `ProfileError::Conversion` naming the path of the first value
    /// that has no TOML representation.
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        Ok(Self {
            table: map_to_table(map, "")?,
        })
    }

    /// Parses TOML text into a document.
    pub fn parse(text: &str) -> Result<Self> {
        let table = text.parse::<Table>().map_err(|e| ProfileError::Decode {
            message: format!("Invalid TOML document: {}", e.message()),
            source: Some(Box::new(e)),
        })?;
        Ok(Self { table })
    }

    /// Serializes the document to its canonical text form.
    ///
    /// Keys are emitted in sorted order, so equal documents always render to
    /// identical text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(&self.table).map_err(|e| ProfileError::Serialize {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Converts the document back into a keyed mapping.
    ///
    /// TOML datetimes become strings in their RFC 3339 form.
    pub fn to_map(&self) -> Result<ConfigMap> {
        table_to_map(&self.table, "")
    }

    /// Returns `true` if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn conversion_error(path: &str, message: impl Into<String>) -> ProfileError {
    ProfileError::Conversion {
        path: if path.is_empty() {
            "<root>".to_string()
        } else {
            path.to_string()
        },
        message: message.into(),
    }
}

fn map_to_table(map: &ConfigMap, path: &str) -> Result<Table> {
    let mut table = Table::new();
    for (key, value) in map {
        let value = to_toml(value, &child_path(path, key))?;
        table.insert(key.clone(), value);
    }
    Ok(table)
}

fn to_toml(value: &ConfigValue, path: &str) -> Result<Value> {
    match value {
        ConfigValue::Null => Err(conversion_error(path, "null has no TOML representation")),
        ConfigValue::Bool(b) => Ok(Value::Boolean(*b)),
        ConfigValue::Number(n) => number_to_toml(n, path),
        ConfigValue::String(s) => Ok(Value::String(s.clone())),
        ConfigValue::Sequence(items) => sequence_to_toml(items, path),
        ConfigValue::Mapping(map) => Ok(Value::Table(map_to_table(map, path)?)),
    }
}

fn number_to_toml(n: &Number, path: &str) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    if n.is_u64() {
        return Err(conversion_error(
            path,
            format!("integer {} exceeds the TOML integer range", n),
        ));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| conversion_error(path, format!("unsupported number {}", n)))
}

/// Converts a sequence, requiring every element to share one TOML type.
///
/// Integers mixed with floats are one kind of value (a number), so they are
/// widened to floats rather than rejected.
fn sequence_to_toml(items: &[ConfigValue], path: &str) -> Result<Value> {
    let mut converted = items
        .iter()
        .enumerate()
        .map(|(i, item)| to_toml(item, &format!("{}[{}]", path, i)))
        .collect::<Result<Vec<_>>>()?;

    let mut kinds: Vec<&'static str> = converted.iter().map(Value::type_str).collect();
    kinds.sort_unstable();
    kinds.dedup();

    match kinds.as_slice() {
        [] | [_] => {}
        ["float", "integer"] => {
            for value in converted.iter_mut() {
                if let Value::Integer(i) = *value {
                    *value = Value::Float(i as f64);
                }
            }
        }
        mixed => {
            return Err(conversion_error(
                path,
                format!("sequence mixes element types ({})", mixed.join(", ")),
            ));
        }
    }

    Ok(Value::Array(converted))
}

fn table_to_map(table: &Table, path: &str) -> Result<ConfigMap> {
    table
        .iter()
        .map(|(key, value)| Ok((key.clone(), from_toml(value, &child_path(path, key))?)))
        .collect()
}

fn from_toml(value: &Value, path: &str) -> Result<ConfigValue> {
    match value {
        Value::String(s) => Ok(ConfigValue::String(s.clone())),
        Value::Integer(i) => Ok(ConfigValue::Number(Number::from(*i))),
        Value::Float(f) => Number::from_f64(*f)
            .map(ConfigValue::Number)
            .ok_or_else(|| conversion_error(path, format!("non-finite float {}", f))),
        Value::Boolean(b) => Ok(ConfigValue::Bool(*b)),
        Value::Datetime(dt) => Ok(ConfigValue::String(dt.to_string())),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| from_toml(item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>>>()
            .map(ConfigValue::Sequence),
        Value::Table(table) => Ok(ConfigValue::Mapping(table_to_map(table, path)?)),
    }
}
