//! Record validation against a contract type's configuration.

use chrono::NaiveDate;
use std::sync::Arc;

use super::duration::DurationPolicy;
use super::result::ValidationResult;
use crate::config::EngineConfig;
use crate::registry::{ContractTypeConfig, Registry};
use crate::utils::dates::DateParser;
use crate::utils::values::{format_number, numeric_field, present, value_text, NumericField, Record};

/// Record field names the validator reads.
pub mod fields {
    /// Contract start date.
    pub const CONTRACT_START_DATE: &str = "contract_start_date";
    /// Contract end date.
    pub const CONTRACT_END_DATE: &str = "contract_end_date";
    /// Monthly basic salary.
    pub const BASIC_SALARY: &str = "basic_salary";
    /// ISO currency code of the salary.
    pub const CURRENCY: &str = "currency";
    /// Contracted weekly hours.
    pub const WORKING_HOURS_PER_WEEK: &str = "working_hours_per_week";
    /// Probation length in months.
    pub const PROBATION_PERIOD_MONTHS: &str = "probation_period_months";
    /// Notice length in days.
    pub const NOTICE_PERIOD_DAYS: &str = "notice_period_days";
    /// Place of work.
    pub const WORK_LOCATION: &str = "work_location";
}

use fields::{
    BASIC_SALARY, CONTRACT_END_DATE, CONTRACT_START_DATE, CURRENCY, NOTICE_PERIOD_DAYS,
    PROBATION_PERIOD_MONTHS, WORKING_HOURS_PER_WEEK, WORK_LOCATION,
};

/// Validates records against the contract types of one registry snapshot.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: Arc<Registry>,
    policy: DurationPolicy,
    dates: DateParser,
}

impl ValidationEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, &EngineConfig::default())
    }

    /// Creates an engine using `config`'s duration policy and date formats.
    #[must_use]
    pub fn with_config(registry: Arc<Registry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            policy: config.duration_policy,
            dates: config.date_parser(),
        }
    }

    /// Validates `record` against the contract type `type_id`.
    #[must_use]
    pub fn validate(&self, type_id: &str, record: &Record) -> ValidationResult {
        let Some(config) = self.registry.types().get(type_id) else {
            tracing::debug!(contract_type = %type_id, "Validation requested for unknown contract type");
            return ValidationResult::unknown_type();
        };

        let result = validate_record(config, record, self.policy, &self.dates);
        tracing::debug!(
            contract_type = %type_id,
            is_valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validated contract record"
        );
        result
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn date(&mut self, record: &Record, field: &str, dates: &DateParser) -> Option<NaiveDate> {
        let value = present(record, field)?;
        match dates.parse(&value_text(value)) {
            Ok(date) => Some(date),
            Err(_) => {
                self.errors.push(format!("{field} is not a valid date"));
                None
            }
        }
    }

    fn number(&mut self, record: &Record, field: &str) -> Option<f64> {
        match numeric_field(record, field) {
            NumericField::Valid(n) => Some(n),
            NumericField::Absent => None,
            NumericField::Invalid => {
                self.errors.push(format!("{field} is not a valid number"));
                None
            }
        }
    }
}

/// Validates one record against one contract type.
///
/// Findings are appended in a fixed rule order: required fields, dates and
/// duration, salary, minimum wage, working hours, probation, notice period,
/// remote work. The same input always yields the same output.
#[must_use]
pub fn validate_record(
    config: &ContractTypeConfig,
    record: &Record,
    policy: DurationPolicy,
    dates: &DateParser,
) -> ValidationResult {
    let mut findings = Findings::default();
    let name = &config.name;
    let limits = &config.constraints;

    for field in &config.required_fields {
        if present(record, field).is_none() {
            findings.errors.push(format!("{field} is required for {name}"));
        }
    }

    let start = findings.date(record, CONTRACT_START_DATE, dates);
    let end = findings.date(record, CONTRACT_END_DATE, dates);
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            findings
                .errors
                .push(format!("{CONTRACT_END_DATE} must be after {CONTRACT_START_DATE}"));
        } else {
            let months = policy.elapsed_months(start, end);
            if let Some(max) = limits.max_duration_months {
                if months > i64::from(max) {
                    findings.errors.push(format!(
                        "Contract duration of {months} months exceeds the maximum of {max} months for {name}"
                    ));
                }
            }
            if let Some(min) = limits.min_duration_months {
                if months < i64::from(min) {
                    findings.errors.push(format!(
                        "Contract duration of {months} months is below the minimum of {min} months for {name}"
                    ));
                }
            }
        }
    }

    let salary = findings.number(record, BASIC_SALARY);
    if let Some(amount) = salary {
        if !limits.allows_salary && amount > 0.0 {
            findings.warnings.push(format!(
                "{BASIC_SALARY} of {} is set but {name} does not provide for a salary",
                format_number(amount)
            ));
        }
    }

    if let (Some(amount), Some(currency)) = (salary, present(record, CURRENCY)) {
        let currency = value_text(currency).trim().to_uppercase();
        if let Some(floor) = limits.minimum_wage.get(&currency) {
            if amount < *floor {
                findings.warnings.push(format!(
                    "{BASIC_SALARY} of {} {currency} is below the minimum wage of {} {currency}",
                    format_number(amount),
                    format_number(*floor)
                ));
            }
        }
    }

    if let Some(hours) = findings.number(record, WORKING_HOURS_PER_WEEK) {
        if let Some(max) = limits.max_weekly_hours {
            if hours > max {
                findings.errors.push(format!(
                    "{WORKING_HOURS_PER_WEEK} of {} exceeds the maximum of {} hours for {name}",
                    format_number(hours),
                    format_number(max)
                ));
            }
        }
    }

    if let Some(months) = findings.number(record, PROBATION_PERIOD_MONTHS) {
        if !limits.allows_probation {
            if months > 0.0 {
                findings
                    .errors
                    .push(format!("{name} does not allow a probation period"));
            }
        } else if let Some(max) = limits.max_probation_months {
            if months > f64::from(max) {
                findings.errors.push(format!(
                    "{PROBATION_PERIOD_MONTHS} of {} exceeds the maximum of {max} months for {name}",
                    format_number(months)
                ));
            }
        }
    }

    if let Some(days) = findings.number(record, NOTICE_PERIOD_DAYS) {
        if let Some(min) = limits.min_notice_days {
            if days < f64::from(min) {
                findings.errors.push(format!(
                    "{NOTICE_PERIOD_DAYS} of {} is below the minimum of {min} days for {name}",
                    format_number(days)
                ));
            }
        }
        if let Some(max) = limits.max_notice_days {
            if days > f64::from(max) {
                findings.errors.push(format!(
                    "{NOTICE_PERIOD_DAYS} of {} exceeds the maximum of {max} days for {name}",
                    format_number(days)
                ));
            }
        }
    }

    if !limits.allows_remote_work {
        if let Some(location) = present(record, WORK_LOCATION) {
            if value_text(location).trim().eq_ignore_ascii_case("remote") {
                findings
                    .warnings
                    .push(format!("{name} does not allow remote work but {WORK_LOCATION} is remote"));
            }
        }
    }

    ValidationResult::new(findings.errors, findings.warnings)
}
