//! Re-index a keyed collection by a nested property of its values.
//!
//! Values whose computed keys collide are grouped in source order, so the
//! result distinguishes a lone match from a group explicitly.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::deep::deep_get;

/// A re-keyed slot: either one value or every value that shared the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Grouped<T> {
    Single(T),
    Group(Vec<T>),
}

impl<T> Grouped<T> {
    /// Append a value, promoting a single slot to a group.
    pub fn push(&mut self, value: T) {
        match self {
            Grouped::Group(items) => items.push(value),
            Grouped::Single(_) => {
                if let Grouped::Single(first) = std::mem::replace(self, Grouped::Group(Vec::new())) {
                    *self = Grouped::Group(vec![first, value]);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Grouped::Single(_) => 1,
            Grouped::Group(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Grouped::Single(value) => vec![value],
            Grouped::Group(items) => items,
        }
    }
}

pub type Rehashed = BTreeMap<String, Grouped<Value>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RehashOptions {
    /// Also keep each value under its original key.
    pub maintain_source_key: bool,
    /// Start from the source's own entries instead of an empty target.
    pub modify_source: bool,
}

/// Re-index `source` by the deep-path `property` of each value.
///
/// Keys are the string form of the property value, so `false` and `0` are
/// usable keys while a missing property lands under `"undefined"`. Values
/// whose key is the empty string are dropped.
pub fn rehash(source: Map<String, Value>, property: &str, options: RehashOptions) -> Rehashed {
    let entries: Vec<(String, Value)> = source.into_iter().collect();

    let mut target: Rehashed = if options.modify_source {
        entries
            .iter()
            .map(|(key, value)| (key.clone(), Grouped::Single(value.clone())))
            .collect()
    } else {
        BTreeMap::new()
    };

    for (source_key, value) in entries {
        let target_key = key_string(deep_get(&value, property));
        if target_key.is_empty() {
            continue;
        }

        match target.get_mut(&target_key) {
            Some(existing) => existing.push(value.clone()),
            None => {
                target.insert(target_key, Grouped::Single(value.clone()));
            }
        }

        if options.modify_source && !options.maintain_source_key {
            target.remove(&source_key);
        } else if options.maintain_source_key && !options.modify_source {
            target.insert(source_key, Grouped::Single(value));
        }
    }

    target
}

/// String form of a looked-up value, following script string conversion.
pub fn key_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number_string(number),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => key_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn number_string(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{}", float as i128),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn groups_colliding_keys_in_source_order() {
        let input = source(json!({
            "a": {"k": "x", "n": 1},
            "b": {"k": "x", "n": 2},
            "c": {"k": "y"}
        }));

        let result = rehash(input, "k", RehashOptions::default());

        assert_eq!(result.len(), 2);
        assert_eq!(
            result["x"],
            Grouped::Group(vec![json!({"k": "x", "n": 1}), json!({"k": "x", "n": 2})])
        );
        assert_eq!(result["y"], Grouped::Single(json!({"k": "y"})));
    }

    #[test]
    fn serializes_to_scalar_or_array_shape() {
        let input = source(json!({"a": {"k": "x"}, "b": {"k": "x"}, "c": {"k": "y"}}));
        let result = serde_json::to_value(rehash(input, "k", RehashOptions::default())).unwrap();
        assert_eq!(
            result,
            json!({"x": [{"k": "x"}, {"k": "x"}], "y": {"k": "y"}})
        );
    }

    #[test]
    fn falsy_keys_are_kept_as_strings() {
        let input = source(json!({
            "a": {"on": false},
            "b": {"on": 0},
            "c": {"on": null}
        }));
        let result = rehash(input, "on", RehashOptions::default());
        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["0", "false", "null"]);
    }

    #[test]
    fn empty_key_drops_entry() {
        let input = source(json!({"a": {"k": ""}, "b": {"k": "z"}}));
        let result = rehash(input, "k", RehashOptions::default());
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("z"));
    }

    #[test]
    fn missing_property_groups_under_undefined() {
        let input = source(json!({"a": {}, "b": {"other": 1}}));
        let result = rehash(input, "k", RehashOptions::default());
        assert_eq!(result["undefined"].len(), 2);
    }

    #[test]
    fn deep_property_paths_are_followed() {
        let input = source(json!({
            "a": {"meta": {"tags": ["red"]}},
            "b": {"meta": {"tags": ["blue"]}}
        }));
        let result = rehash(input, "meta.tags[0]", RehashOptions::default());
        assert!(result.contains_key("red"));
        assert!(result.contains_key("blue"));
    }

    #[test]
    fn maintain_source_key_keeps_originals() {
        let input = source(json!({"a": {"k": "x"}}));
        let options = RehashOptions {
            maintain_source_key: true,
            modify_source: false,
        };
        let result = rehash(input, "k", options);
        assert_eq!(result["a"], Grouped::Single(json!({"k": "x"})));
        assert_eq!(result["x"], Grouped::Single(json!({"k": "x"})));
    }

    #[test]
    fn modify_source_replaces_original_keys() {
        let input = source(json!({"a": {"k": "x"}, "b": {"k": "y"}}));
        let options = RehashOptions {
            maintain_source_key: false,
            modify_source: true,
        };
        let result = rehash(input, "k", options);
        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn modify_and_maintain_keeps_both() {
        let input = source(json!({"a": {"k": "x"}}));
        let options = RehashOptions {
            maintain_source_key: true,
            modify_source: true,
        };
        let result = rehash(input, "k", options);
        assert_eq!(result.len(), 2);
        assert!(result.contains_key("a"));
        assert!(result.contains_key("x"));
    }

    #[test]
    fn grouped_push_promotes_single() {
        let mut slot = Grouped::Single(1);
        slot.push(2);
        slot.push(3);
        assert_eq!(slot, Grouped::Group(vec![1, 2, 3]));
        assert_eq!(slot.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn key_string_follows_script_conversion() {
        assert_eq!(key_string(Some(&json!(1.0))), "1");
        assert_eq!(key_string(Some(&json!(1.5))), "1.5");
        assert_eq!(key_string(Some(&json!([1, null, "a"]))), "1,,a");
        assert_eq!(key_string(Some(&json!({"a": 1}))), "[object Object]");
        assert_eq!(key_string(Some(&json!(true))), "true");
    }
}
