//! Coercion of loosely-typed JSON values into answer text.
//!
//! Records and produced answers come from external collaborators, so a lab
//! value may arrive as `8.2` or `"8.2"`. Both render to the same text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a scalar JSON value as text.
///
/// Returns `None` for `null`, arrays, and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Render any JSON value as text. Nested values use compact JSON.
///
/// Returns `None` only for `null`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_text(scalar),
    }
}

/// Deserialize an optional field into text.
///
/// Missing and `null` both become `None`. Nested objects and arrays render
/// as compact JSON.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_text))
}

/// Deserialize a field into text, treating `null` as the empty string.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Deserialize a list that may be `null`, treating `null` as empty.
pub fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
