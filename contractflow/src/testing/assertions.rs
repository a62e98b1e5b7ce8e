//! Assertions for validation results.

use crate::validation::ValidationResult;

/// Asserts that the result is valid.
pub fn assert_valid(result: &ValidationResult) {
    assert!(
        result.is_valid,
        "Expected a valid record, got errors: {:?}",
        result.errors
    );
}

/// Asserts that the result is invalid.
pub fn assert_invalid(result: &ValidationResult) {
    assert!(
        !result.is_valid,
        "Expected an invalid record, but validation passed"
    );
}

/// Asserts that some error contains `needle`.
pub fn assert_has_error(result: &ValidationResult, needle: &str) {
    assert!(
        result.has_error_containing(needle),
        "Expected an error containing '{}', got: {:?}",
        needle,
        result.errors
    );
}

/// Asserts that some warning contains `needle`.
pub fn assert_has_warning(result: &ValidationResult, needle: &str) {
    assert!(
        result.has_warning_containing(needle),
        "Expected a warning containing '{}', got: {:?}",
        needle,
        result.warnings
    );
}

/// Asserts the exact number of errors and warnings.
pub fn assert_finding_counts(result: &ValidationResult, errors: usize, warnings: usize) {
    assert_eq!(
        (result.errors.len(), result.warnings.len()),
        (errors, warnings),
        "Unexpected findings. Errors: {:?} Warnings: {:?}",
        result.errors,
        result.warnings
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings() -> ValidationResult {
        ValidationResult::new(
            vec!["job_title is required for Oman Unlimited Employment Contract".to_string()],
            vec!["basic_salary of 300 OMR is below the minimum wage of 325 OMR".to_string()],
        )
    }

    #[test]
    fn test_assertions_accept_matching_results() {
        let result = findings();
        assert_invalid(&result);
        assert_has_error(&result, "job_title is required");
        assert_has_warning(&result, "minimum wage");
        assert_finding_counts(&result, 1, 1);
        assert_valid(&ValidationResult::new(Vec::new(), Vec::new()));
    }

    #[test]
    #[should_panic(expected = "Expected an invalid record")]
    fn test_assert_invalid_rejects_valid_result() {
        assert_invalid(&ValidationResult::new(Vec::new(), vec!["w".to_string()]));
    }

    #[test]
    #[should_panic(expected = "Unexpected findings")]
    fn test_assert_finding_counts_rejects_mismatch() {
        assert_finding_counts(&findings(), 2, 1);
    }
}
