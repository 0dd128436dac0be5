//! Forgiving serde field deserializers for client-authored JSON.
//!
//! Profile payloads come from a browser form, so the same field may arrive as a
//! string, a number, `null`, or be missing entirely. These helpers coerce such
//! values instead of rejecting the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar JSON value as text. `null`, arrays and objects become "".
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Any scalar as `String`; missing or `null` as "".
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

/// Any scalar as `Some(String)`; `null` and blank text as `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let s = value_to_string(&value);
    if s.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(s))
    }
}

/// Coerces a number or numeric string to `i32`. Anything else is "no value".
pub fn coerce_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

/// Marks a text field as present in the payload, keeping an explicit `null` as `Some(None)`.
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn present_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(match value {
        Value::Null => None,
        other => Some(value_to_string(&other)),
    }))
}

/// Keeps any JSON value, `null` included, when the field is present.
pub fn present_json<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Like [`present_string`], for integer fields that tolerate garbage by clearing the value.
pub fn present_int<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(coerce_int(&value)))
}
