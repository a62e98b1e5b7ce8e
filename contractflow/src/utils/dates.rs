//! Calendar date parsing for record fields.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write as _;
use thiserror::Error;

/// Errors that can occur during date parsing or formatting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// The date string is empty.
    #[error("Empty date string")]
    EmptyString,

    /// No accepted format matched.
    #[error("Invalid date: {0}")]
    InvalidFormat(String),

    /// The output format string contains an unknown specifier.
    #[error("Invalid date format pattern: {0}")]
    InvalidPattern(String),
}

/// Formats tried after ISO-8601 when none are configured.
pub const DEFAULT_EXTRA_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y"];

/// Parses calendar dates from the string forms records carry.
///
/// ISO-8601 dates (`2024-01-31`), RFC 3339 timestamps and naive
/// `YYYY-MM-DDTHH:MM:SS` timestamps are always accepted; additional
/// `chrono` formats are tried in order afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    extra_formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(DEFAULT_EXTRA_FORMATS.iter().copied())
    }
}

impl DateParser {
    /// Creates a parser with the given extra formats.
    #[must_use]
    pub fn new(extra_formats: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            extra_formats: extra_formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the extra formats tried after ISO-8601.
    #[must_use]
    pub fn extra_formats(&self) -> &[String] {
        &self.extra_formats
    }

    /// Parses a date.
    ///
    /// # Errors
    ///
    /// Returns `DateError` if the input is empty or matches no format.
    pub fn parse(&self, input: &str) -> Result<NaiveDate, DateError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(DateError::EmptyString);
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.date_naive());
        }

        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(dt.date());
            }
        }

        for fmt in &self.extra_formats {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                return Ok(date);
            }
        }

        Err(DateError::InvalidFormat(trimmed.to_string()))
    }
}

/// Checks that a `strftime` pattern only uses specifiers chrono understands.
///
/// # Errors
///
/// Returns `DateError::InvalidPattern` for unknown specifiers.
pub fn validate_pattern(pattern: &str) -> Result<(), DateError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(DateError::InvalidPattern(pattern.to_string()));
    }
    Ok(())
}

/// Formats a date, reporting bad patterns instead of panicking.
///
/// # Errors
///
/// Returns `DateError::InvalidPattern` if formatting fails.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String, DateError> {
    validate_pattern(pattern)?;
    let mut out = String::new();
    write!(out, "{}", date.format(pattern))
        .map_err(|_| DateError::InvalidPattern(pattern.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        let parser = DateParser::default();
        assert_eq!(parser.parse("2024-01-31").unwrap(), ymd(2024, 1, 31));
        assert_eq!(parser.parse("  2024-01-31 ").unwrap(), ymd(2024, 1, 31));
    }

    #[test]
    fn test_parse_timestamps() {
        let parser = DateParser::default();
        assert_eq!(parser.parse("2024-03-01T10:00:00Z").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parser.parse("2024-03-01T10:00:00+04:00").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parser.parse("2024-03-01T10:00:00").unwrap(), ymd(2024, 3, 1));
    }

    #[test]
    fn test_parse_extra_formats() {
        let parser = DateParser::default();
        assert_eq!(parser.parse("15/06/2024").unwrap(), ymd(2024, 6, 15));
        assert_eq!(parser.parse("15-06-2024").unwrap(), ymd(2024, 6, 15));

        let strict = DateParser::new(Vec::<String>::new());
        assert!(strict.parse("15/06/2024").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let parser = DateParser::default();
        assert_eq!(parser.parse(""), Err(DateError::EmptyString));
        assert!(matches!(parser.parse("next tuesday"), Err(DateError::InvalidFormat(_))));
        assert!(parser.parse("2024-02-30").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2024, 1, 5), "%d-%m-%Y").unwrap(), "05-01-2024");
        assert!(format_date(ymd(2024, 1, 5), "%Q").is_err());
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern("%d/%m/%Y").is_ok());
        assert!(validate_pattern("%B %-d, %Y").is_ok());
        assert!(validate_pattern("%Q").is_err());
    }
}
