//! Validation engine tests against the built-in catalog.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::config::EngineConfig;
    use crate::registry::catalog::ids;
    use crate::registry::Registry;
    use crate::utils::values::Record;
    use crate::validation::{DurationPolicy, ValidationEngine, UNKNOWN_CONTRACT_TYPE};

    fn engine() -> ValidationEngine {
        ValidationEngine::new(Arc::new(Registry::builtin().unwrap()))
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn employment() -> Record {
        record(json!({
            "first_party_id": "employer-001",
            "second_party_id": "promoter-042",
            "job_title": "Site Engineer",
            "contract_start_date": "2024-01-01",
            "basic_salary": 450,
            "currency": "OMR",
            "work_location": "Muscat"
        }))
    }

    fn with(mut base: Record, field: &str, value: Value) -> Record {
        base.insert(field.to_string(), value);
        base
    }

    fn without(mut base: Record, field: &str) -> Record {
        base.remove(field);
        base
    }

    #[test]
    fn test_complete_record_is_valid() {
        let result = engine().validate(ids::OMAN_UNLIMITED, &employment());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let result = engine().validate("no-such-type", &employment());
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![UNKNOWN_CONTRACT_TYPE.to_string()]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_fields_one_error_each() {
        let base = without(without(employment(), "job_title"), "currency");
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "job_title is required for Oman Unlimited Employment Contract".to_string(),
                "currency is required for Oman Unlimited Employment Contract".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_fields_independent_of_record_order() {
        let mut reversed = Record::new();
        for (key, value) in employment().into_iter().rev() {
            if key != "job_title" && key != "first_party_id" {
                reversed.insert(key, value);
            }
        }
        let result = engine().validate(ids::OMAN_UNLIMITED, &reversed);
        assert_eq!(result.errors.len(), 2);
        assert!(result.has_error_containing("first_party_id is required"));
        assert!(result.has_error_containing("job_title is required"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let base = with(employment(), "job_title", json!("   "));
        let base = with(base, "currency", Value::Null);
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_fixed_term_over_maximum_duration() {
        let base = with(employment(), "contract_end_date", json!("2027-01-01"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "Contract duration of 36 months exceeds the maximum of 24 months for Oman Fixed-Term Employment Contract"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_fixed_term_within_bounds() {
        let base = with(employment(), "contract_end_date", json!("2025-06-30"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_fixed_term_below_minimum_duration() {
        let base = with(employment(), "contract_end_date", json!("2024-01-15"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);
        assert_eq!(result.errors.len(), 1);
        assert!(result.has_error_containing("is below the minimum of 1 months"));
    }

    #[test]
    fn test_end_before_start_skips_duration_checks() {
        let base = with(employment(), "contract_end_date", json!("2023-01-01"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);
        assert_eq!(
            result.errors,
            vec!["contract_end_date must be after contract_start_date".to_string()]
        );
    }

    #[test]
    fn test_equal_dates_are_rejected() {
        let base = with(employment(), "contract_end_date", json!("2024-01-01"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);
        assert!(result.has_error_containing("must be after"));
        assert!(!result.has_error_containing("Contract duration"));
    }

    #[test]
    fn test_unparseable_date() {
        let base = with(employment(), "contract_end_date", json!("next spring"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);
        assert_eq!(
            result.errors,
            vec!["contract_end_date is not a valid date".to_string()]
        );
    }

    #[test]
    fn test_day_first_dates_accepted() {
        let base = with(employment(), "contract_start_date", json!("01/01/2024"));
        let base = with(base, "contract_end_date", json!("31-12-2024"));
        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_calendar_policy_counts_whole_months() {
        let registry = Arc::new(Registry::builtin().unwrap());
        let config = EngineConfig::new().with_duration_policy(DurationPolicy::CalendarMonths);
        let engine = ValidationEngine::with_config(registry, &config);

        // 751 days: 25 thirty-day months but only 24 calendar months
        let base = with(employment(), "contract_end_date", json!("2026-01-21"));
        let result = engine.validate(ids::OMAN_FIXED_TERM, &base);
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(self::engine()
            .validate(ids::OMAN_FIXED_TERM, &base)
            .has_error_containing("25 months exceeds the maximum of 24"));

        let base = with(employment(), "contract_end_date", json!("2026-02-01"));
        let result = engine.validate(ids::OMAN_FIXED_TERM, &base);
        assert!(result.has_error_containing("25 months exceeds the maximum of 24"));
    }

    #[test]
    fn test_part_time_hours_ceiling() {
        let over = with(employment(), "working_hours_per_week", json!(30));
        let result = engine().validate(ids::OMAN_PART_TIME, &over);
        assert_eq!(
            result.errors,
            vec![
                "working_hours_per_week of 30 exceeds the maximum of 25 hours for Oman Part-Time Employment Contract"
                    .to_string()
            ]
        );

        let under = with(employment(), "working_hours_per_week", json!(20));
        let result = engine().validate(ids::OMAN_PART_TIME, &under);
        assert!(result.is_valid);
        assert!(!result.has_error_containing("working_hours_per_week"));
    }

    #[test]
    fn test_minimum_wage_is_warning_only() {
        let base = with(employment(), "basic_salary", json!(300));
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(
            result.warnings,
            vec!["basic_salary of 300 OMR is below the minimum wage of 325 OMR".to_string()]
        );
    }

    #[test]
    fn test_minimum_wage_ignores_other_currencies() {
        let base = with(employment(), "basic_salary", json!(300));
        let base = with(base, "currency", json!("USD"));
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let base = with(employment(), "basic_salary", json!("1,200.500"));
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_number() {
        let base = with(employment(), "working_hours_per_week", json!("forty"));
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);
        assert_eq!(
            result.errors,
            vec!["working_hours_per_week is not a valid number".to_string()]
        );
    }

    #[test]
    fn test_decimal_comma_is_not_a_thousands_separator() {
        let base = with(employment(), "probation_period_months", json!("1,5"));
        let result = engine().validate(ids::OMAN_UNLIMITED, &base);
        assert_eq!(
            result.errors,
            vec!["probation_period_months is not a valid number".to_string()]
        );
    }

    #[test]
    fn test_salary_on_consulting_agreement_warns() {
        let base = record(json!({
            "first_party_id": "client-7",
            "second_party_id": "consultant-3",
            "scope_of_work": "ERP rollout",
            "contract_start_date": "2024-03-01",
            "contract_end_date": "2025-03-01",
            "professional_fee": 1500,
            "currency": "OMR",
            "basic_salary": 800
        }));
        let result = engine().validate(ids::CONSULTING, &base);
        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            vec![
                "basic_salary of 800 is set but Consulting Services Agreement does not provide for a salary"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_probation_rules() {
        let over = with(employment(), "probation_period_months", json!(4));
        let result = engine().validate(ids::OMAN_UNLIMITED, &over);
        assert_eq!(
            result.errors,
            vec![
                "probation_period_months of 4 exceeds the maximum of 3 months for Oman Unlimited Employment Contract"
                    .to_string()
            ]
        );

        let executive = with(
            with(employment(), "reporting_to", json!("CEO")),
            "probation_period_months",
            json!(4),
        );
        assert!(engine().validate(ids::EXECUTIVE, &executive).is_valid);

        let internship = record(json!({
            "first_party_id": "host-1",
            "second_party_id": "intern-9",
            "contract_start_date": "2024-06-01",
            "contract_end_date": "2024-09-01",
            "training_program": "Civil engineering",
            "supervisor_name": "A. Al-Harthy",
            "probation_period_months": 1
        }));
        let result = engine().validate(ids::OMAN_INTERNSHIP, &internship);
        assert_eq!(
            result.errors,
            vec!["Oman Internship Agreement does not allow a probation period".to_string()]
        );

        let zero = with(internship, "probation_period_months", json!(0));
        assert!(engine().validate(ids::OMAN_INTERNSHIP, &zero).is_valid);
    }

    #[test]
    fn test_notice_bounds() {
        let short = with(employment(), "notice_period_days", json!(14));
        let result = engine().validate(ids::OMAN_UNLIMITED, &short);
        assert_eq!(
            result.errors,
            vec![
                "notice_period_days of 14 is below the minimum of 30 days for Oman Unlimited Employment Contract"
                    .to_string()
            ]
        );

        let long = with(employment(), "notice_period_days", json!(120));
        let result = engine().validate(ids::OMAN_UNLIMITED, &long);
        assert!(result.has_error_containing("exceeds the maximum of 90 days"));
    }

    #[test]
    fn test_remote_location_warning() {
        let base = with(employment(), "work_location", json!("Remote"));

        let on_site = engine().validate(ids::OMAN_UNLIMITED, &base);
        assert!(on_site.is_valid);
        assert_eq!(
            on_site.warnings,
            vec![
                "Oman Unlimited Employment Contract does not allow remote work but work_location is remote"
                    .to_string()
            ]
        );

        let remote = engine().validate(ids::REMOTE_WORK, &base);
        assert!(remote.warnings.is_empty());
    }

    #[test]
    fn test_findings_follow_rule_order() {
        let base = without(employment(), "job_title");
        let base = with(base, "contract_end_date", json!("2030-01-01"));
        let base = with(base, "basic_salary", json!(200));
        let base = with(base, "working_hours_per_week", json!(60));
        let base = with(base, "probation_period_months", json!(5));
        let base = with(base, "notice_period_days", json!(7));
        let base = with(base, "work_location", json!("remote"));

        let result = engine().validate(ids::OMAN_FIXED_TERM, &base);

        let name = "Oman Fixed-Term Employment Contract";
        assert_eq!(
            result.errors,
            vec![
                format!("job_title is required for {name}"),
                format!("Contract duration of 73 months exceeds the maximum of 24 months for {name}"),
                format!("working_hours_per_week of 60 exceeds the maximum of 48 hours for {name}"),
                format!("probation_period_months of 5 exceeds the maximum of 3 months for {name}"),
                format!("notice_period_days of 7 is below the minimum of 30 days for {name}"),
            ]
        );
        assert_eq!(
            result.warnings,
            vec![
                "basic_salary of 200 OMR is below the minimum wage of 325 OMR".to_string(),
                format!("{name} does not allow remote work but work_location is remote"),
            ]
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let base = with(employment(), "notice_period_days", json!(7));
        let engine = engine();
        let first = engine.validate(ids::OMAN_UNLIMITED, &base);
        let second = engine.validate(ids::OMAN_UNLIMITED, &base);
        assert_eq!(first, second);
    }
}
