//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigurationError;
use crate::utils::dates::{DateParser, DEFAULT_EXTRA_FORMATS};
use crate::validation::DurationPolicy;

/// Settings shared by the registries, validators and compilers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How elapsed contract months are counted.
    #[serde(default)]
    pub duration_policy: DurationPolicy,
    /// Fail registry construction on business-rule drift instead of
    /// logging it.
    #[serde(default)]
    pub strict_rule_coverage: bool,
    /// Date formats tried after ISO-8601.
    #[serde(default = "default_date_formats")]
    pub accepted_date_formats: Vec<String>,
    /// Appended to the template name to form blueprint names.
    #[serde(default = "default_blueprint_suffix")]
    pub blueprint_name_suffix: String,
    /// Apply contract type defaults before validating.
    #[serde(default = "default_apply_defaults")]
    pub apply_defaults: bool,
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_EXTRA_FORMATS.iter().map(|s| (*s).to_string()).collect()
}

fn default_blueprint_suffix() -> String {
    "document pipeline".to_string()
}

fn default_apply_defaults() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration_policy: DurationPolicy::default(),
            strict_rule_coverage: false,
            accepted_date_formats: default_date_formats(),
            blueprint_name_suffix: default_blueprint_suffix(),
            apply_defaults: default_apply_defaults(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duration policy.
    #[must_use]
    pub fn with_duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.duration_policy = policy;
        self
    }

    /// Enables or disables strict rule coverage.
    #[must_use]
    pub fn with_strict_rule_coverage(mut self, strict: bool) -> Self {
        self.strict_rule_coverage = strict;
        self
    }

    /// Replaces the extra accepted date formats.
    #[must_use]
    pub fn with_date_formats(mut self, formats: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.accepted_date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the blueprint name suffix.
    #[must_use]
    pub fn with_blueprint_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.blueprint_name_suffix = suffix.into();
        self
    }

    /// Enables or disables default-value application.
    #[must_use]
    pub fn with_apply_defaults(mut self, apply: bool) -> Self {
        self.apply_defaults = apply;
        self
    }

    /// Builds the date parser for this configuration.
    #[must_use]
    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.accepted_date_formats.iter().cloned())
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Catalog` if the document is invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Catalog {
            source_name: "<inline engine config>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Catalog` if the file cannot be read or
    /// parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Catalog {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigurationError::Catalog {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.duration_policy, DurationPolicy::ThirtyDayMonths);
        assert!(!config.strict_rule_coverage);
        assert!(config.apply_defaults);
        assert_eq!(config.accepted_date_formats, vec!["%d/%m/%Y", "%d-%m-%Y"]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"duration_policy": "calendar_months"}"#).unwrap();
        assert_eq!(config.duration_policy, DurationPolicy::CalendarMonths);
        assert_eq!(config.blueprint_name_suffix, "document pipeline");
    }

    #[test]
    fn test_invalid_json_is_a_configuration_error() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigurationError::Catalog { .. }));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"strict_rule_coverage": true, "apply_defaults": false}}"#).unwrap();

        let config = EngineConfig::from_path(file.path()).unwrap();
        assert!(config.strict_rule_coverage);
        assert!(!config.apply_defaults);

        assert!(EngineConfig::from_path("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = EngineConfig::new()
            .with_date_formats(["%Y/%m/%d"])
            .with_blueprint_name_suffix("flow");
        let parser = config.date_parser();
        assert!(parser.parse("2024/02/01").is_ok());
        assert!(parser.parse("01/02/2024").is_err());
        assert_eq!(config.blueprint_name_suffix, "flow");
    }
}
