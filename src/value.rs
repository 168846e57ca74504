//! Helpers for inspecting JSON values the way rules see them.
//!
//! A missing key is `None`; a present `null` is `Some(Value::Null)`. Both
//! count as absent for emptiness checks.

use serde_json::Value;

/// Types whose empty string counts as an empty value.
fn is_native_string_type(rule_type: &str) -> bool {
    matches!(
        rule_type,
        "string" | "url" | "hex" | "email" | "date" | "pattern"
    )
}

/// Whether a value counts as empty for the given rule type.
pub fn is_empty_value(value: Option<&Value>, rule_type: Option<&str>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => rule_type == Some("array") && items.is_empty(),
        Some(Value::String(s)) => s.is_empty() && rule_type.is_some_and(is_native_string_type),
        Some(_) => false,
    }
}

/// Whether a value is neither missing nor `null`.
pub fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// Loose truthiness: missing, `null`, `false`, `0` and `""` are falsy.
/// Containers are truthy even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Look up a direct child by key (object key or array index).
pub fn child<'v>(container: &'v Value, key: &str) -> Option<&'v Value> {
    match container {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Mutable variant of [`child`].
pub fn child_mut<'v>(container: &'v mut Value, key: &str) -> Option<&'v mut Value> {
    match container {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => key
            .parse::<usize>()
            .ok()
            .and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

/// Whether the container declares the key, regardless of its value.
pub fn has_field(container: &Value, key: &str) -> bool {
    child(container, key).is_some()
}

/// Write a child value. Objects gain the key if missing; arrays are only
/// written within bounds. Returns false when nothing was written.
pub fn set_child(container: &mut Value, key: &str, value: Value) -> bool {
    match container {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            true
        }
        Value::Array(items) => match key.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Walk a path of keys from the root.
pub fn value_at<'v>(root: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(root, |current, key| child(current, key))
}

/// Mutable variant of [`value_at`].
pub fn value_at_mut<'v>(root: &'v mut Value, path: &[String]) -> Option<&'v mut Value> {
    path.iter()
        .try_fold(root, |current, key| child_mut(current, key))
}

/// Keys of a container in iteration order: object keys or array indices.
pub fn container_keys(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Type name used when a rule infers its type from the value.
pub fn type_of(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) | Some(Value::Object(_)) => "object",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
    }
}

/// Render a value for message text: strings unquoted, arrays comma-joined.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => display_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Convert a numeric bound to a message argument without a trailing `.0`.
pub fn number_arg(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
