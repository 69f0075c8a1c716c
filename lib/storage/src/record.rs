//! Lenient field readers shared by the dataset loaders
//!
//! Upstream JSON is loosely typed: a field can be a number or a string with
//! units, a string or a translation object, one value or a list. These
//! helpers normalize one field at a time; record-level validation lives in
//! the loaders.

use matledger_core::Result;
use serde_json::Value;
use std::path::Path;

/// Records produced by a loader, plus what had to be left out
#[derive(Debug, Clone)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    /// Records rejected by validation
    pub skipped: usize,
    pub files_read: usize,
    /// Files that could not be read or parsed
    pub files_failed: usize,
}

impl<T> Default for LoadOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            files_read: 0,
            files_failed: 0,
        }
    }
}

impl<T> LoadOutcome<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// A number, or a string starting with one (`"250 g"`)
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A plain string, or a translation object carrying `str`/`str_sp`
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("str")
            .or_else(|| obj.get("str_sp"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// A string, a list of strings, or a list of objects with a `type` key
pub(crate) fn as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj.get("type").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Non-empty string field
pub(crate) fn non_empty_str<'a>(value: Option<&'a Value>) -> Option<&'a str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}
