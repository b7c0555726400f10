//! Tolerant field decoders for documents written by older clients.
//!
//! Stored collections were produced by loosely typed code: ids may be numbers,
//! flags may be `null` or `1`, and custom field values may be any scalar.
//! These helpers coerce such values the way the original writers read them
//! back, so a structurally plausible document always decodes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// JavaScript-style truthiness of a JSON value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a number the way JavaScript's `String(n)` does for common values.
pub(crate) fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// String form of a scalar, or `None` for `null`, arrays and objects.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Any value as text: `null` is empty, arrays and objects keep their JSON
/// text so nothing the user typed is thrown away.
pub(crate) fn loose_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => scalar_text(other).unwrap_or_else(|| other.to_string()),
    }
}

pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(loose_text(&Value::deserialize(d)?))
}

pub(crate) fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(scalar_text(&value))
}

pub(crate) fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(is_truthy(&value))
}

pub(crate) fn flag_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, bool>, D::Error> {
    match Value::deserialize(d)? {
        Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, is_truthy(&v))).collect()),
        _ => Ok(BTreeMap::new()),
    }
}

pub(crate) fn text_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(k, v)| scalar_text(&v).map(|s| (k, s)))
            .collect()),
        _ => Ok(BTreeMap::new()),
    }
}

/// Binder slots: falsy entries are empty pockets.
pub(crate) fn slot_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Option<String>>, D::Error> {
    match Value::deserialize(d)? {
        Value::Array(items) => Ok(items
            .iter()
            .map(|v| if is_truthy(v) { scalar_text(v) } else { None })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// A list of records. Anything but an array reads as empty; entries that do
/// not decode are dropped with a warning.
pub(crate) fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Dropped malformed list entry: {}", e);
                None
            }
        })
        .collect())
}

/// A list of names. Anything but an array reads as empty; falsy and
/// non-scalar entries are skipped.
pub(crate) fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Array(items) => Ok(items
            .iter()
            .filter(|v| is_truthy(v))
            .filter_map(scalar_text)
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// An optional record that reads as `None` when it does not decode.
pub(crate) fn or_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(d)?).ok())
}
