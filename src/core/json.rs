use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;

/// Resolve a JSON argument: inline JSON, `@path` to a file, or `-` for stdin.
pub fn read_json_spec_to_string(spec: &str) -> Result<String> {
    use std::io::IsTerminal;

    if spec.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(Error::validation_invalid_argument(
                "json",
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        stdin
            .read_to_string(&mut buf)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "json",
                "Invalid JSON spec '@' (missing file path)",
                None,
                None,
            ));
        }

        return fs::read_to_string(path).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("read json file spec '{}'", path)),
            )
        });
    }

    Ok(spec.to_string())
}

/// Parse a JSON argument (see [`read_json_spec_to_string`]).
pub fn parse_json_spec(spec: &str, context: &str) -> Result<Value> {
    let raw = read_json_spec_to_string(spec)?;
    serde_json::from_str(&raw).map_err(|e| {
        Error::validation_invalid_json(
            e,
            Some(context.to_string()),
            Some(raw.chars().take(200).collect()),
        )
    })
}

/// Parse a JSON argument that must be an object.
pub fn parse_json_object_spec(spec: &str, context: &str) -> Result<Map<String, Value>> {
    match parse_json_spec(spec, context)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::validation_invalid_argument(
            "json",
            format!("Expected a JSON object, got {}", value_type_name(&other)),
            None,
            None,
        )),
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn set_json_pointer(root: &mut Value, pointer: &str, new_value: Value) -> Result<()> {
    let pointer = normalize_pointer(pointer)?;
    let Some((parent_ptr, token)) = split_parent_pointer(&pointer) else {
        *root = new_value;
        return Ok(());
    };

    let parent = ensure_pointer_container(root, &parent_ptr)?;
    set_child(parent, &token, new_value)
}

pub fn remove_json_pointer(root: &mut Value, pointer: &str) -> Result<()> {
    let pointer = normalize_pointer(pointer)?;
    let Some((parent_ptr, token)) = split_parent_pointer(&pointer) else {
        return Err(Error::validation_invalid_argument(
            "pointer",
            "Cannot remove the root JSON value",
            None,
            None,
        ));
    };

    let Some(parent) = root.pointer_mut(&parent_ptr) else {
        return Err(Error::validation_invalid_argument(
            "pointer",
            format!("JSON pointer parent path not found: {}", parent_ptr),
            None,
            None,
        ));
    };

    match parent {
        Value::Object(map) => {
            map.remove(&token);
            Ok(())
        }
        _ => Err(Error::config_invalid_value(
            "jsonPointer",
            Some(value_type_name(parent).to_string()),
            "Cannot remove child on non-object",
        )),
    }
}

fn normalize_pointer(pointer: &str) -> Result<String> {
    if pointer.is_empty() {
        return Ok(String::new());
    }

    if !pointer.starts_with('/') || pointer == "/" {
        return Err(Error::validation_invalid_argument(
            "pointer",
            format!("Invalid JSON pointer: {}", pointer),
            None,
            None,
        ));
    }

    Ok(pointer.to_string())
}

fn split_parent_pointer(pointer: &str) -> Option<(String, String)> {
    if pointer.is_empty() {
        return None;
    }

    let (parent, token) = pointer.rsplit_once('/')?;
    Some((parent.to_string(), unescape_token(token)))
}

fn ensure_pointer_container<'a>(root: &'a mut Value, pointer: &str) -> Result<&'a mut Value> {
    let mut current = root;

    for token in pointer.split('/').skip(1).map(unescape_token) {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let next = match current {
            Value::Object(map) => map
                .entry(token)
                .or_insert_with(|| Value::Object(Map::new())),
            other => {
                return Err(Error::config_invalid_value(
                    pointer,
                    Some(value_type_name(other).to_string()),
                    "Expected object at pointer",
                ))
            }
        };

        current = next;
    }

    Ok(current)
}

fn set_child(parent: &mut Value, token: &str, value: Value) -> Result<()> {
    if parent.is_null() {
        *parent = Value::Object(Map::new());
    }
    match parent {
        Value::Object(map) => {
            map.insert(token.to_string(), value);
            Ok(())
        }
        _ => Err(Error::config_invalid_value(
            "jsonPointer",
            Some(value_type_name(parent).to_string()),
            "Cannot set child on non-object",
        )),
    }
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[test]
    fn inline_spec_is_returned_verbatim() {
        assert_eq!(read_json_spec_to_string(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn at_spec_reads_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"k":"v"}"#).unwrap();
        let spec = format!("@{}", file.path().display());
        assert_eq!(parse_json_spec(&spec, "test").unwrap(), json!({"k": "v"}));
    }

    #[test]
    fn bare_at_is_rejected() {
        assert!(read_json_spec_to_string("@ ").is_err());
    }

    #[test]
    fn object_spec_rejects_arrays() {
        let err = parse_json_object_spec("[1,2]", "test").unwrap_err();
        assert_eq!(err.details["problem"], "Expected a JSON object, got array");
    }

    #[test]
    fn value_arg_falls_back_to_string() {
        assert_eq!(parse_value_arg("42"), json!(42));
        assert_eq!(parse_value_arg(r#"{"a":true}"#), json!({"a": true}));
        assert_eq!(parse_value_arg("hello"), json!("hello"));
    }

    #[test]
    fn set_pointer_creates_parents() {
        let mut root = json!({});
        set_json_pointer(&mut root, "/defaults/text/ellipsis", json!("…")).unwrap();
        assert_eq!(root, json!({"defaults": {"text": {"ellipsis": "…"}}}));
    }

    #[test]
    fn set_pointer_rejects_scalar_parent() {
        let mut root = json!({"a": 1});
        assert!(set_json_pointer(&mut root, "/a/b", json!(2)).is_err());
    }

    #[test]
    fn remove_pointer_deletes_key() {
        let mut root = json!({"defaults": {"dates": {"utc": true}}});
        remove_json_pointer(&mut root, "/defaults/dates/utc").unwrap();
        assert_eq!(root, json!({"defaults": {"dates": {}}}));
    }

    #[test]
    fn pointer_tokens_are_unescaped() {
        let mut root = json!({});
        set_json_pointer(&mut root, "/a~1b/c~0d", json!(1)).unwrap();
        assert_eq!(root, json!({"a/b": {"c~d": 1}}));
    }

    #[test]
    fn invalid_pointers_are_rejected() {
        let mut root = json!({});
        assert!(set_json_pointer(&mut root, "a/b", json!(1)).is_err());
        assert!(set_json_pointer(&mut root, "/", json!(1)).is_err());
        assert!(remove_json_pointer(&mut root, "").is_err());
    }
}
