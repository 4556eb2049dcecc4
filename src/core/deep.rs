//! Deeply nested property access over JSON values.
//!
//! Paths use dot and/or bracket notation: `a.b`, `a["b"]`, `a['b'].c`,
//! `.a[0].b`. Brackets are rewritten to dot segments, one leading dot is
//! dropped, and the result is split on dots.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// `["x"]`, `['x']` and `[x]`; quotes only strip when both sides match
static BRACKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\["([^\]]+?)"\]|\['([^\]]+?)'\]|\[["']?(.+?)\]"#).unwrap()
});

/// Furthest an array may be padded with `null` by a single set.
const MAX_ARRAY_PADDING: usize = 10_000;

/// Parsed deep path: an ordered list of property names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepPath {
    segments: Vec<String>,
}

impl DeepPath {
    pub fn parse(path: &str) -> Self {
        let dotted = BRACKET_PATTERN.replace_all(path, |caps: &Captures| {
            let segment = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3));
            format!(".{}", segment.map_or("", |m| m.as_str()))
        });
        let dotted = dotted.strip_prefix('.').unwrap_or(&dotted);
        Self {
            segments: dotted.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// All segments but the last, plus the last one.
    fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

impl FromStr for DeepPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for DeepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => parse_index(segment).and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

/// Read a deeply nested value. Returns `None` as soon as a step is missing.
pub fn deep_get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    deep_get_path(root, &DeepPath::parse(path))
}

pub fn deep_get_path<'a>(root: &'a Value, path: &DeepPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| child(current, segment))
}

pub fn deep_get_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let path = DeepPath::parse(path);
    path.segments()
        .iter()
        .try_fold(root, |current, segment| child_mut(current, segment))
}

/// Set a deeply nested value, creating intermediate objects as needed.
///
/// Any non-container met along the way (including the root) is replaced by
/// an empty object. Returns the root so calls can be chained.
pub fn deep_set<'a>(root: &'a mut Value, path: &str, value: Value) -> Result<&'a mut Value> {
    deep_set_path(root, &DeepPath::parse(path), value)?;
    Ok(root)
}

pub fn deep_set_path(root: &mut Value, path: &DeepPath, value: Value) -> Result<()> {
    let (parents, last) = path.split_last();

    let mut current = root;
    for segment in parents {
        current = slot(current, segment)?;
    }

    *slot(current, last)? = value;
    Ok(())
}

/// Mutable slot for `segment` inside `container`, inserting `null` if absent.
fn slot<'a>(container: &'a mut Value, segment: &str) -> Result<&'a mut Value> {
    if !container.is_object() && !container.is_array() {
        *container = Value::Object(Map::new());
    }

    match container {
        Value::Object(map) => Ok(map.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = parse_index(segment).ok_or_else(|| {
                Error::validation_invalid_argument(
                    "path",
                    format!("Cannot address array element with '{}'", segment),
                    Some(segment.to_string()),
                    None,
                )
            })?;
            if index.saturating_sub(items.len()) > MAX_ARRAY_PADDING {
                return Err(Error::validation_invalid_argument(
                    "path",
                    format!(
                        "Index {} is too far past the end of an array of length {}",
                        index,
                        items.len()
                    ),
                    Some(segment.to_string()),
                    None,
                ));
            }
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            Ok(&mut items[index])
        }
        _ => Err(Error::internal_unexpected("container was just coerced to an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_dot_path() {
        assert_eq!(DeepPath::parse("a.b.c").segments(), ["a", "b", "c"]);
    }

    #[test]
    fn parse_bracket_variants() {
        assert_eq!(DeepPath::parse(r#"a["b"]['c'][d]"#).segments(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn parse_keeps_mismatched_quotes() {
        assert_eq!(DeepPath::parse(r#"x["a']"#).segments(), ["x", "a'"]);
        assert_eq!(DeepPath::parse(r#"x['a"]"#).segments(), ["x", "a\""]);
    }

    #[test]
    fn parse_strips_single_leading_dot() {
        assert_eq!(DeepPath::parse(".a.b").segments(), ["a", "b"]);
        assert_eq!(DeepPath::parse("[0].x").segments(), ["0", "x"]);
    }

    #[test]
    fn parse_display_round_trips_to_dots() {
        let path: DeepPath = r#"a['b'][2]"#.parse().unwrap();
        assert_eq!(path.to_string(), "a.b.2");
    }

    #[test]
    fn get_walks_objects_and_arrays() {
        let data = json!({"a": {"list": [{"name": "first"}, {"name": "second"}]}});
        assert_eq!(deep_get(&data, "a.list[1].name"), Some(&json!("second")));
        assert_eq!(deep_get(&data, r#"a["list"][0]["name"]"#), Some(&json!("first")));
    }

    #[test]
    fn get_stops_at_undefined() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(deep_get(&data, "a.x.y.z"), None);
        assert_eq!(deep_get(&data, "a.b.c"), None);
    }

    #[test]
    fn get_single_segment_is_direct_access() {
        let data = json!({"k": false});
        assert_eq!(deep_get(&data, "k"), data.get("k"));
    }

    #[test]
    fn get_mut_allows_in_place_edit() {
        let mut data = json!({"a": {"b": 1}});
        if let Some(v) = deep_get_mut(&mut data, "a.b") {
            *v = json!(2);
        }
        assert_eq!(data, json!({"a": {"b": 2}}));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut data = json!({});
        deep_set(&mut data, "a.b.c", json!(1)).unwrap();
        assert_eq!(data, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn set_overwrites_scalars_along_the_path() {
        let mut data = json!({"a": 5});
        deep_set(&mut data, "a.b", json!("x")).unwrap();
        assert_eq!(data, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn set_returns_root_for_chaining() {
        let mut data = json!({"keep": true});
        let root = deep_set(&mut data, "x", json!(1)).unwrap();
        assert_eq!(root["keep"], json!(true));
        deep_set(root, "y", json!(2)).unwrap();
        assert_eq!(data, json!({"keep": true, "x": 1, "y": 2}));
    }

    #[test]
    fn set_replaces_scalar_root() {
        let mut data = Value::Null;
        deep_set(&mut data, "a", json!(1)).unwrap();
        assert_eq!(data, json!({"a": 1}));
    }

    #[test]
    fn set_pads_arrays_by_index() {
        let mut data = json!({"list": [1]});
        deep_set(&mut data, "list[3]", json!(4)).unwrap();
        assert_eq!(data, json!({"list": [1, null, null, 4]}));
    }

    #[test]
    fn set_rejects_index_far_past_array_end() {
        let mut data = json!({"list": [1]});
        let err = deep_set(&mut data, "list[18446744073709551615]", json!(0)).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");

        let err = deep_set(&mut data, "list[100000000000]", json!(0)).unwrap_err();
        assert_eq!(err.details["id"], "100000000000");
        assert_eq!(data, json!({"list": [1]}));
    }

    #[test]
    fn set_rejects_named_member_on_array() {
        let mut data = json!({"list": []});
        let err = deep_set(&mut data, "list.name", json!(1)).unwrap_err();
        assert_eq!(err.details["id"], "name");
    }

    #[test]
    fn set_then_get_round_trips() {
        let paths = [
            "a",
            "a.b",
            r#"a["b"].c"#,
            "x1['y2'][z3].w4",
            r#".p[q]["r"].s.t5"#,
        ];
        for (i, path) in paths.iter().enumerate() {
            let mut data = json!({});
            deep_set(&mut data, path, json!(i)).unwrap();
            assert_eq!(deep_get(&data, path), Some(&json!(i)), "{}", path);
        }
    }
}
