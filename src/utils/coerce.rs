//! Value shape coercion.

use serde_json::Value;

/// Ensure we have an array to iterate.
///
/// - `None` (undefined) becomes an empty Vec
/// - an array is returned as-is, moved rather than copied
/// - any other value is wrapped in a single-element Vec
pub fn ensure_array(value: Option<Value>) -> Vec<Value> {
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}
