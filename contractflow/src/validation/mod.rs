//! Record validation.
//!
//! This module provides:
//! - The validation engine and its fixed rule order
//! - Duration policies for month arithmetic
//! - Business-rule coverage checks run at registry build time

mod coverage;
mod duration;
mod engine;
#[cfg(test)]
mod engine_tests;
mod result;

pub use coverage::{check_rule_coverage, is_enforced, RuleCoverageReport};
pub use duration::{calendar_months, thirty_day_months, DurationPolicy};
pub use engine::{fields, validate_record, ValidationEngine};
pub use result::{ValidationResult, UNKNOWN_CONTRACT_TYPE};
