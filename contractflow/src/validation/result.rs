//! Validation result type.

use serde::{Deserialize, Serialize};

/// Error reported when the contract type is not registered.
pub const UNKNOWN_CONTRACT_TYPE: &str = "unknown contract type";

/// Outcome of validating one record against one contract type.
///
/// Errors block document generation; warnings are advisory and never
/// affect `is_valid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when `errors` is empty.
    pub is_valid: bool,
    /// Blocking findings, in rule order.
    pub errors: Vec<String>,
    /// Advisory findings, in rule order.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Builds a result, deriving `is_valid` from `errors`.
    #[must_use]
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// The result for an unregistered contract type.
    #[must_use]
    pub fn unknown_type() -> Self {
        Self::new(vec![UNKNOWN_CONTRACT_TYPE.to_string()], Vec::new())
    }

    /// True if any error contains `needle`.
    #[must_use]
    pub fn has_error_containing(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.contains(needle))
    }

    /// True if any warning contains `needle`.
    #[must_use]
    pub fn has_warning_containing(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_follows_errors_only() {
        let ok = ValidationResult::new(Vec::new(), vec!["advisory".to_string()]);
        assert!(ok.is_valid);

        let bad = ValidationResult::new(vec!["x is required".to_string()], Vec::new());
        assert!(!bad.is_valid);
        assert!(bad.has_error_containing("required"));
    }

    #[test]
    fn test_unknown_type() {
        let result = ValidationResult::unknown_type();
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![UNKNOWN_CONTRACT_TYPE.to_string()]);
    }
}
