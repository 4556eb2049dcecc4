//! Namespace creation on nested JSON objects.

use serde_json::{Map, Value};

/// Ensure every dot-separated segment of `ns` exists as an object under
/// `root`, returning the deepest one.
///
/// Existing objects are reused. Any other value found at a segment, arrays
/// included, is replaced by an empty object. A non-object root is replaced
/// the same way.
pub fn namespace<'a>(root: &'a mut Value, ns: &str) -> &'a mut Map<String, Value> {
    ns.split('.').fold(ensure_object(root), |current, segment| {
        ensure_object(
            current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
        )
    })
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Owned root standing in for a shared global scope.
///
/// Namespaces created through one registry are visible to every later call
/// on the same registry; nothing is process-global.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    root: Value,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(&mut self, ns: &str) -> &mut Map<String, Value> {
        namespace(&mut self.root, ns)
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}
