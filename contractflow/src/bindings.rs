//! Variable bindings: how template variables are computed from record fields.
//!
//! A binding names one or more input fields and an optional transform drawn
//! from a closed set. There is no expression evaluator; every binding can be
//! checked against the registries before any record is seen.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use crate::utils::dates::{self, DateParser};
use crate::utils::values::{format_number, parse_number, present, value_text, Record};

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[^A-Z0-9]").unwrap()
});

/// Where a binding reads its input from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingSource {
    /// A single record field.
    Field {
        /// Input field name.
        field: String,
    },
    /// Several fields rendered as text and joined.
    Concat {
        /// Input field names, in output order.
        fields: Vec<String>,
        /// Separator placed between present values.
        #[serde(default = "default_separator")]
        separator: String,
    },
}

/// Upper bound on `Scale` rounding; `f64` carries about 15 significant digits.
pub const MAX_SCALE_DECIMALS: u32 = 15;

fn default_separator() -> String {
    " ".to_string()
}

/// The transforms a binding may apply to its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transform {
    /// Strip leading and trailing whitespace.
    Trim,
    /// Uppercase, then drop every character outside `A-Z0-9`.
    UppercaseAlphanumeric,
    /// Parse as a date and re-render with a `strftime` pattern.
    DateFormat {
        /// Output pattern, e.g. `%d-%m-%Y`.
        pattern: String,
    },
    /// Multiply a numeric value by a constant.
    Scale {
        /// Multiplier.
        factor: f64,
        /// Round the result to this many decimal places.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decimals: Option<u32>,
    },
}

/// Errors raised while evaluating a binding against a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A value could not be read as a number.
    #[error("value '{value}' is not a number")]
    NotANumber {
        /// Offending value text.
        value: String,
    },

    /// A value could not be read as a date.
    #[error("{0}")]
    Date(#[from] dates::DateError),

    /// A scale produced a non-finite result.
    #[error("scaling '{value}' by {factor} does not produce a finite number")]
    NotFinite {
        /// Offending value text.
        value: String,
        /// Scale factor.
        factor: String,
    },
}

/// Maps one output variable to record fields plus an optional transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    /// Input source.
    pub source: BindingSource,
    /// Optional transform applied to the source value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl Binding {
    /// Binds a single field verbatim.
    #[must_use]
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            source: BindingSource::Field { field: field.into() },
            transform: None,
        }
    }

    /// Binds several fields joined by `separator`.
    #[must_use]
    pub fn concat(
        fields: impl IntoIterator<Item = impl Into<String>>,
        separator: impl Into<String>,
    ) -> Self {
        Self {
            source: BindingSource::Concat {
                fields: fields.into_iter().map(Into::into).collect(),
                separator: separator.into(),
            },
            transform: None,
        }
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Shorthand for a trimmed field.
    #[must_use]
    pub fn trimmed(field: impl Into<String>) -> Self {
        Self::field(field).with_transform(Transform::Trim)
    }

    /// Shorthand for a date field re-rendered with `pattern`.
    #[must_use]
    pub fn date(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::field(field).with_transform(Transform::DateFormat {
            pattern: pattern.into(),
        })
    }

    /// Input fields referenced by this binding, in source order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        match &self.source {
            BindingSource::Field { field } => vec![field.as_str()],
            BindingSource::Concat { fields, .. } => fields.iter().map(String::as_str).collect(),
        }
    }

    /// Checks the binding's own structure, independent of any registry.
    ///
    /// # Errors
    ///
    /// Returns a description of the first structural problem found.
    pub fn check(&self) -> Result<(), String> {
        let fields = self.fields();
        if fields.is_empty() {
            return Err("binding references no fields".to_string());
        }
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err("binding references an empty field name".to_string());
        }
        match &self.transform {
            Some(Transform::DateFormat { pattern }) => {
                dates::validate_pattern(pattern).map_err(|e| e.to_string())
            }
            Some(Transform::Scale { factor, .. }) if !factor.is_finite() => {
                Err(format!("scale factor {factor} is not finite"))
            }
            Some(Transform::Scale {
                decimals: Some(places),
                ..
            }) if *places > MAX_SCALE_DECIMALS => Err(format!(
                "scale rounds to {places} decimal places, at most {MAX_SCALE_DECIMALS} are supported"
            )),
            _ => Ok(()),
        }
    }

    /// Evaluates the binding.
    ///
    /// Returns `Ok(None)` when none of the referenced fields are present.
    ///
    /// # Errors
    ///
    /// Returns `BindingError` when the transform cannot be applied.
    pub fn evaluate(
        &self,
        record: &Record,
        parser: &DateParser,
    ) -> Result<Option<Value>, BindingError> {
        let raw = match &self.source {
            BindingSource::Field { field } => match present(record, field) {
                Some(value) => value.clone(),
                None => return Ok(None),
            },
            BindingSource::Concat { fields, separator } => {
                let parts: Vec<String> = fields
                    .iter()
                    .filter_map(|f| present(record, f))
                    .map(value_text)
                    .collect();
                if parts.is_empty() {
                    return Ok(None);
                }
                Value::String(parts.join(separator))
            }
        };

        match &self.transform {
            None => Ok(Some(raw)),
            Some(transform) => apply_transform(transform, &raw, parser).map(Some),
        }
    }
}

fn apply_transform(
    transform: &Transform,
    value: &Value,
    parser: &DateParser,
) -> Result<Value, BindingError> {
    match transform {
        Transform::Trim => Ok(Value::String(value_text(value).trim().to_string())),
        Transform::UppercaseAlphanumeric => {
            let upper = value_text(value).to_uppercase();
            Ok(Value::String(NON_ALPHANUMERIC.replace_all(&upper, "").into_owned()))
        }
        Transform::DateFormat { pattern } => {
            let date = parser.parse(&value_text(value))?;
            Ok(Value::String(dates::format_date(date, pattern)?))
        }
        Transform::Scale { factor, decimals } => {
            let number = parse_number(value).ok_or_else(|| BindingError::NotANumber {
                value: value_text(value),
            })?;
            let mut scaled = number * factor;
            if let Some(places) = decimals {
                let places = (*places).min(MAX_SCALE_DECIMALS);
                let unit = 10f64.powi(i32::try_from(places).unwrap_or(0));
                scaled = (scaled * unit).round() / unit;
            }
            serde_json::Number::from_f64(scaled)
                .map(Value::Number)
                .ok_or_else(|| BindingError::NotFinite {
                    value: value_text(value),
                    factor: format_number(*factor),
                })
        }
    }
}
