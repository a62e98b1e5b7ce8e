//! Helpers for reading loosely typed record values.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Commas are accepted only as thousands separators: `1,200` or `12,345.5`.
static GROUPED_THOUSANDS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap()
});

/// A contract record: field name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Outcome of reading a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericField {
    /// The field is absent, null or an empty string.
    Absent,
    /// The field holds a finite number or numeric string.
    Valid(f64),
    /// The field is present but not a number.
    Invalid,
}

/// True for values that count as "not provided": null, empty or
/// whitespace-only strings.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Returns the field value unless it is missing or blank.
#[must_use]
pub fn present<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !is_blank(v))
}

/// Renders a scalar value as display text. Strings are returned without
/// quotes; arrays and objects fall back to compact JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Reads a numeric field from a number or a numeric string.
#[must_use]
pub fn numeric_field(record: &Record, field: &str) -> NumericField {
    match present(record, field) {
        None => NumericField::Absent,
        Some(value) => parse_number(value).map_or(NumericField::Invalid, NumericField::Valid),
    }
}

/// Parses a JSON number or numeric string into a finite `f64`.
#[must_use]
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_text(s.trim()),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    if text.contains(',') {
        if !GROUPED_THOUSANDS.is_match(text) {
            return None;
        }
        return text.replace(',', "").parse::<f64>().ok();
    }
    text.parse::<f64>().ok()
}

/// Formats a number without a trailing `.0` for whole values.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
