//! Drift detection between documented business rules and enforced checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::registry::{ContractTypeConfig, RuleCheck};

/// Checks that reject records and therefore must be documented by a rule.
const MUST_DOCUMENT: [RuleCheck; 6] = [
    RuleCheck::MaxDuration,
    RuleCheck::MinDuration,
    RuleCheck::MaxWeeklyHours,
    RuleCheck::MaxProbation,
    RuleCheck::ProbationDisallowed,
    RuleCheck::NoticeBounds,
];

/// Coverage findings for one contract type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCoverageReport {
    /// Contract type id.
    pub type_id: String,
    /// Rule statements with no enforcing check.
    pub unenforced_rules: Vec<String>,
    /// Rule statements citing a check whose constraint is not configured.
    pub unbacked_rules: Vec<String>,
    /// Rejecting checks that no rule documents.
    pub undocumented_checks: Vec<RuleCheck>,
}

impl RuleCoverageReport {
    /// True when documented and enforced policy agree.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unenforced_rules.is_empty()
            && self.unbacked_rules.is_empty()
            && self.undocumented_checks.is_empty()
    }

    /// One line per finding.
    #[must_use]
    pub fn findings(&self) -> Vec<String> {
        let mut out = Vec::new();
        for rule in &self.unenforced_rules {
            out.push(format!("rule '{rule}' is not enforced by any check"));
        }
        for rule in &self.unbacked_rules {
            out.push(format!("rule '{rule}' cites a check whose constraint is not configured"));
        }
        for check in &self.undocumented_checks {
            out.push(format!("{check} is enforced but no business rule documents it"));
        }
        out
    }
}

/// True when the type's configuration makes the validator apply `check`.
#[must_use]
pub fn is_enforced(config: &ContractTypeConfig, check: RuleCheck) -> bool {
    let c = &config.constraints;
    match check {
        RuleCheck::RequiredFields => !config.required_fields.is_empty(),
        RuleCheck::DateOrder => true,
        RuleCheck::MaxDuration => c.max_duration_months.is_some(),
        RuleCheck::MinDuration => c.min_duration_months.is_some(),
        RuleCheck::SalaryDisallowed => !c.allows_salary,
        RuleCheck::MinimumWage => !c.minimum_wage.is_empty(),
        RuleCheck::MaxWeeklyHours => c.max_weekly_hours.is_some(),
        RuleCheck::MaxProbation => c.allows_probation && c.max_probation_months.is_some(),
        RuleCheck::ProbationDisallowed => !c.allows_probation,
        RuleCheck::NoticeBounds => c.min_notice_days.is_some() || c.max_notice_days.is_some(),
        RuleCheck::RemoteWorkDisallowed => !c.allows_remote_work,
    }
}

/// Compares a type's business rules against the checks its constraints enable.
#[must_use]
pub fn check_rule_coverage(config: &ContractTypeConfig) -> RuleCoverageReport {
    let mut report = RuleCoverageReport {
        type_id: config.id.clone(),
        ..RuleCoverageReport::default()
    };
    let mut documented = BTreeSet::new();

    for rule in &config.business_rules {
        match rule.enforced_by {
            None => report.unenforced_rules.push(rule.statement.clone()),
            Some(check) if !is_enforced(config, check) => {
                report.unbacked_rules.push(rule.statement.clone());
            }
            Some(check) => {
                documented.insert(check);
            }
        }
    }

    report.undocumented_checks = MUST_DOCUMENT
        .into_iter()
        .filter(|check| is_enforced(config, *check) && !documented.contains(check))
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BusinessRule, ContractConstraints};

    #[test]
    fn test_clean_type() {
        let config = ContractTypeConfig::new("pt", "Part-Time", "employment")
            .with_required(["job_title"])
            .with_constraints(ContractConstraints::new().with_max_weekly_hours(25.0))
            .with_rule(BusinessRule::enforced("Job title is required", RuleCheck::RequiredFields))
            .with_rule(BusinessRule::enforced(
                "No more than 25 hours per week",
                RuleCheck::MaxWeeklyHours,
            ));

        let report = check_rule_coverage(&config);
        assert!(report.is_clean(), "{:?}", report.findings());
    }

    #[test]
    fn test_prose_only_rule_is_flagged() {
        let config = ContractTypeConfig::new("t", "T", "c")
            .with_rule(BusinessRule::documented("Contract must be bilingual"));

        let report = check_rule_coverage(&config);
        assert_eq!(report.unenforced_rules, vec!["Contract must be bilingual".to_string()]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_rule_citing_unconfigured_constraint_is_flagged() {
        let config = ContractTypeConfig::new("t", "T", "c").with_rule(BusinessRule::enforced(
            "Maximum 24 months",
            RuleCheck::MaxDuration,
        ));

        let report = check_rule_coverage(&config);
        assert_eq!(report.unbacked_rules.len(), 1);
        assert!(report.findings()[0].contains("Maximum 24 months"));
    }

    #[test]
    fn test_undocumented_limit_is_flagged() {
        let config = ContractTypeConfig::new("t", "T", "c").with_constraints(
            ContractConstraints::new()
                .with_duration_months(None, Some(24))
                .without_probation(),
        );

        let report = check_rule_coverage(&config);
        assert_eq!(
            report.undocumented_checks,
            vec![RuleCheck::MaxDuration, RuleCheck::ProbationDisallowed]
        );
    }

    #[test]
    fn test_warning_only_checks_need_no_rule() {
        let config = ContractTypeConfig::new("t", "T", "c").with_constraints(
            ContractConstraints::new()
                .without_salary()
                .without_remote_work()
                .with_minimum_wage("OMR", 325.0),
        );

        assert!(check_rule_coverage(&config).is_clean());
    }
}
