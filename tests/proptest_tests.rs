// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check that arbitrary JSON profiles survive the trip through
//! TOML text unchanged.

use profile_sync::domain::{ConfigMap, ConfigValue, ProfileDocument};
use proptest::prelude::*;
use serde_json::{Map, Number, Value};

const KEY: &str = "[a-zA-Z0-9_]{1,12}";

fn float() -> impl Strategy<Value = Value> {
    (-1.0e6..1.0e6f64).prop_map(|f| Value::Number(Number::from_f64(f).unwrap()))
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[ -~]{0,16}".prop_map(Value::String),
        any::<i64>().prop_map(|i| Value::Number(Number::from(i))),
        float(),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Arrays of one scalar type, and arrays of such arrays.
fn homogeneous_array() -> BoxedStrategy<Value> {
    let flat = prop_oneof![
        prop::collection::vec("[a-z]{0,8}".prop_map(Value::String), 0..4),
        prop::collection::vec(any::<i64>().prop_map(|i| Value::Number(Number::from(i))), 0..4),
        prop::collection::vec(float(), 0..4),
        prop::collection::vec(any::<bool>().prop_map(Value::Bool), 0..4),
    ]
    .prop_map(Value::Array)
    .boxed();
    prop_oneof![
        3 => flat.clone(),
        1 => prop::collection::vec(flat, 0..3).prop_map(Value::Array),
    ]
    .boxed()
}

fn object() -> impl Strategy<Value = Map<String, Value>> {
    let value = prop_oneof![4 => leaf(), 1 => homogeneous_array()].prop_recursive(
        3,
        24,
        4,
        |inner| {
            let table = prop::collection::btree_map(KEY, inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
                .boxed();
            let tables = prop::collection::vec(table.clone(), 0..3)
                .prop_map(Value::Array)
                .boxed();
            prop_oneof![
                3 => table,
                1 => tables.clone(),
                1 => prop::collection::vec(tables, 0..3).prop_map(Value::Array),
            ]
        },
    );
    prop::collection::btree_map(KEY, value, 0..6).prop_map(|m| m.into_iter().collect())
}

fn to_config_map(object: Map<String, Value>) -> ConfigMap {
    ConfigValue::from(Value::Object(object))
        .into_mapping()
        .unwrap()
}

proptest! {
    #[test]
    fn test_profile_round_trips_through_toml(object in object()) {
        let map = to_config_map(object);
        let text = ProfileDocument::from_map(&map).unwrap().to_toml_string().unwrap();
        let reparsed = ProfileDocument::parse(&text).unwrap().to_map().unwrap();
        prop_assert_eq!(reparsed, map);
    }
}

proptest! {
    #[test]
    fn test_serialization_is_deterministic(object in object()) {
        let map = to_config_map(object);
        let first = ProfileDocument::from_map(&map).unwrap().to_toml_string().unwrap();
        let second = ProfileDocument::from_map(&map).unwrap().to_toml_string().unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #[test]
    fn test_null_anywhere_is_rejected(key in "[a-z]{1,8}", nested in any::<bool>()) {
        let value = if nested {
            serde_json::json!({ "Outer": { key.clone(): null } })
        } else {
            serde_json::json!({ key.clone(): null })
        };
        let map = ConfigValue::from(value).into_mapping().unwrap();
        let err = ProfileDocument::from_map(&map).unwrap_err();
        prop_assert_eq!(err.kind(), "conversion");
    }
}
