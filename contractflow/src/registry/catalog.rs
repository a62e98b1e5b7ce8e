//! Built-in contract types and templates.
//!
//! Every business rule here names the check that enforces it, so the
//! built-in catalog builds under strict rule coverage.

use serde_json::json;

use super::builder::CatalogDocument;
use super::types::{
    BusinessRule, ContractConstraints, ContractTypeConfig, OutputFormat, RuleCheck,
    StoragePattern, TemplateConfig,
};
use crate::bindings::{Binding, Transform};

/// Ids of the built-in catalog entries.
pub mod ids {
    /// Unlimited-duration employment under Omani labour law.
    pub const OMAN_UNLIMITED: &str = "oman-unlimited-makecom";
    /// Fixed-term employment under Omani labour law.
    pub const OMAN_FIXED_TERM: &str = "oman-fixed-term-makecom";
    /// Part-time employment under Omani labour law.
    pub const OMAN_PART_TIME: &str = "oman-part-time-makecom";
    /// Internship agreement. Has no template.
    pub const OMAN_INTERNSHIP: &str = "oman-internship";
    /// Consulting services agreement.
    pub const CONSULTING: &str = "consulting-agreement";
    /// Remote employment, rendered with the unlimited template.
    pub const REMOTE_WORK: &str = "remote-work-agreement";
    /// Executive employment.
    pub const EXECUTIVE: &str = "executive-employment";

    /// Unlimited employment template.
    pub const TEMPLATE_UNLIMITED: &str = "oman-employment-unlimited";
    /// Fixed-term employment template.
    pub const TEMPLATE_FIXED_TERM: &str = "oman-employment-fixed-term";
    /// Part-time employment template.
    pub const TEMPLATE_PART_TIME: &str = "oman-employment-part-time";
    /// Consulting services template.
    pub const TEMPLATE_CONSULTING: &str = "consulting-services";
    /// Executive employment template.
    pub const TEMPLATE_EXECUTIVE: &str = "executive-employment";
}

const LABOUR_LAW: &str = "oman-labour-law";
const COMMERCIAL: &str = "commercial";
const DISPLAY_DATE: &str = "%d-%m-%Y";

const EMPLOYMENT_REQUIRED: [&str; 7] = [
    "first_party_id",
    "second_party_id",
    "job_title",
    "contract_start_date",
    "basic_salary",
    "currency",
    "work_location",
];

const EMPLOYMENT_OPTIONAL: [&str; 8] = [
    "contract_number",
    "department",
    "probation_period_months",
    "notice_period_days",
    "working_hours_per_week",
    "allowances",
    "special_terms",
    "email",
];

fn fields_with(base: &[&str], extra: &[&str]) -> Vec<String> {
    base.iter().chain(extra).map(|f| (*f).to_string()).collect()
}

fn fields_without(base: &[&str], skip: &str) -> Vec<String> {
    base.iter()
        .filter(|f| **f != skip)
        .map(|f| (*f).to_string())
        .collect()
}

fn labour_law_limits() -> ContractConstraints {
    ContractConstraints::new()
        .with_max_weekly_hours(48.0)
        .with_max_probation_months(3)
        .with_notice_days(Some(30), Some(90))
        .with_minimum_wage("OMR", 325.0)
}

fn labour_law_rules(config: ContractTypeConfig) -> ContractTypeConfig {
    config
        .with_rule(BusinessRule::enforced(
            "Employer, employee, job title, start date, salary, currency and work location must be stated",
            RuleCheck::RequiredFields,
        ))
        .with_rule(BusinessRule::enforced(
            "Working hours may not exceed 48 per week",
            RuleCheck::MaxWeeklyHours,
        ))
        .with_rule(BusinessRule::enforced(
            "Probation may not exceed 3 months",
            RuleCheck::MaxProbation,
        ))
        .with_rule(BusinessRule::enforced(
            "Notice must be between 30 and 90 days",
            RuleCheck::NoticeBounds,
        ))
        .with_rule(BusinessRule::enforced(
            "Salaries paid in OMR should meet the 325 OMR minimum wage",
            RuleCheck::MinimumWage,
        ))
}

fn employment_defaults(config: ContractTypeConfig) -> ContractTypeConfig {
    config
        .with_default("currency", json!("OMR"))
        .with_default("notice_period_days", json!(30))
        .with_default("working_hours_per_week", json!(45))
}

/// The built-in contract types.
#[must_use]
pub fn contract_types() -> Vec<ContractTypeConfig> {
    let unlimited = labour_law_rules(
        ContractTypeConfig::new(ids::OMAN_UNLIMITED, "Oman Unlimited Employment Contract", LABOUR_LAW)
            .with_description("Open-ended employment contract for on-site staff")
            .with_required(EMPLOYMENT_REQUIRED)
            .with_optional(EMPLOYMENT_OPTIONAL)
            .with_constraints(labour_law_limits().without_remote_work()),
    )
    .with_rule(BusinessRule::enforced(
        "Remote arrangements use the remote employment contract",
        RuleCheck::RemoteWorkDisallowed,
    ));
    let unlimited = employment_defaults(unlimited).with_template(ids::TEMPLATE_UNLIMITED);

    let fixed_term = labour_law_rules(
        ContractTypeConfig::new(ids::OMAN_FIXED_TERM, "Oman Fixed-Term Employment Contract", LABOUR_LAW)
            .with_description("Employment for a fixed period of up to two years")
            .with_required(fields_with(&EMPLOYMENT_REQUIRED, &["contract_end_date"]))
            .with_optional(EMPLOYMENT_OPTIONAL)
            .with_constraints(
                labour_law_limits()
                    .with_duration_months(Some(1), Some(24))
                    .without_remote_work(),
            ),
    )
    .with_rule(BusinessRule::enforced(
        "The end date must follow the start date",
        RuleCheck::DateOrder,
    ))
    .with_rule(BusinessRule::enforced(
        "Fixed-term contracts may not exceed 24 months",
        RuleCheck::MaxDuration,
    ))
    .with_rule(BusinessRule::enforced(
        "Fixed-term contracts must run for at least 1 month",
        RuleCheck::MinDuration,
    ))
    .with_rule(BusinessRule::enforced(
        "Remote arrangements use the remote employment contract",
        RuleCheck::RemoteWorkDisallowed,
    ));
    let fixed_term = employment_defaults(fixed_term).with_template(ids::TEMPLATE_FIXED_TERM);

    let part_time =
        ContractTypeConfig::new(ids::OMAN_PART_TIME, "Oman Part-Time Employment Contract", LABOUR_LAW)
            .with_description("Employment of at most 25 hours per week")
            .with_required(fields_with(&EMPLOYMENT_REQUIRED, &["working_hours_per_week"]))
            .with_optional(
                fields_without(&EMPLOYMENT_OPTIONAL, "working_hours_per_week")
                    .into_iter()
                    .chain(["contract_end_date".to_string()]),
            )
            .with_constraints(
                ContractConstraints::new()
                    .with_max_weekly_hours(25.0)
                    .with_max_probation_months(3)
                    .with_notice_days(Some(15), Some(60)),
            )
            .with_rule(BusinessRule::enforced(
                "Employer, employee, job title, start date, salary, currency, work location and weekly hours must be stated",
                RuleCheck::RequiredFields,
            ))
            .with_rule(BusinessRule::enforced(
                "Part-time work may not exceed 25 hours per week",
                RuleCheck::MaxWeeklyHours,
            ))
            .with_rule(BusinessRule::enforced(
                "Probation may not exceed 3 months",
                RuleCheck::MaxProbation,
            ))
            .with_rule(BusinessRule::enforced(
                "Notice must be between 15 and 60 days",
                RuleCheck::NoticeBounds,
            ))
            .with_default("currency", json!("OMR"))
            .with_template(ids::TEMPLATE_PART_TIME);

    let internship = ContractTypeConfig::new(ids::OMAN_INTERNSHIP, "Oman Internship Agreement", LABOUR_LAW)
        .with_description("Training placement paid by stipend")
        .with_required([
            "first_party_id",
            "second_party_id",
            "contract_start_date",
            "contract_end_date",
            "training_program",
            "supervisor_name",
        ])
        .with_optional([
            "monthly_stipend",
            "currency",
            "department",
            "working_hours_per_week",
            "special_terms",
        ])
        .with_constraints(
            ContractConstraints::new()
                .with_duration_months(None, Some(12))
                .with_max_weekly_hours(40.0)
                .without_salary()
                .without_probation(),
        )
        .with_rule(BusinessRule::enforced(
            "Intern, host, dates, training program and supervisor must be stated",
            RuleCheck::RequiredFields,
        ))
        .with_rule(BusinessRule::enforced(
            "The end date must follow the start date",
            RuleCheck::DateOrder,
        ))
        .with_rule(BusinessRule::enforced(
            "Internships may not exceed 12 months",
            RuleCheck::MaxDuration,
        ))
        .with_rule(BusinessRule::enforced(
            "Interns may not work more than 40 hours per week",
            RuleCheck::MaxWeeklyHours,
        ))
        .with_rule(BusinessRule::enforced(
            "Internships carry no probation period",
            RuleCheck::ProbationDisallowed,
        ))
        .with_rule(BusinessRule::enforced(
            "Interns receive a stipend, not a salary",
            RuleCheck::SalaryDisallowed,
        ));

    let consulting = ContractTypeConfig::new(ids::CONSULTING, "Consulting Services Agreement", COMMERCIAL)
        .with_description("Fee-based engagement of an independent consultant")
        .with_required([
            "first_party_id",
            "second_party_id",
            "scope_of_work",
            "contract_start_date",
            "contract_end_date",
            "professional_fee",
            "currency",
        ])
        .with_optional([
            "contract_number",
            "payment_terms",
            "deliverables",
            "special_terms",
            "work_location",
        ])
        .with_constraints(
            ContractConstraints::new()
                .with_duration_months(None, Some(36))
                .without_salary()
                .without_probation(),
        )
        .with_rule(BusinessRule::enforced(
            "Client, consultant, scope, dates, fee and currency must be stated",
            RuleCheck::RequiredFields,
        ))
        .with_rule(BusinessRule::enforced(
            "The end date must follow the start date",
            RuleCheck::DateOrder,
        ))
        .with_rule(BusinessRule::enforced(
            "Engagements may not exceed 36 months",
            RuleCheck::MaxDuration,
        ))
        .with_rule(BusinessRule::enforced(
            "Consultants serve no probation period",
            RuleCheck::ProbationDisallowed,
        ))
        .with_rule(BusinessRule::enforced(
            "Consultants are paid a professional fee, not a salary",
            RuleCheck::SalaryDisallowed,
        ))
        .with_default("currency", json!("OMR"))
        .with_default("payment_terms", json!("30 days from invoice"))
        .with_template(ids::TEMPLATE_CONSULTING);

    let remote = labour_law_rules(
        ContractTypeConfig::new(ids::REMOTE_WORK, "Remote Employment Contract", LABOUR_LAW)
            .with_description("Open-ended employment performed away from company premises")
            .with_required(EMPLOYMENT_REQUIRED)
            .with_optional(fields_with(
                &EMPLOYMENT_OPTIONAL,
                &["equipment_provided", "contract_end_date"],
            ))
            .with_constraints(labour_law_limits()),
    )
    .with_default("currency", json!("OMR"))
    .with_default("work_location", json!("Remote"))
    .with_template(ids::TEMPLATE_UNLIMITED);

    let executive = ContractTypeConfig::new(ids::EXECUTIVE, "Executive Employment Contract", LABOUR_LAW)
        .with_description("Senior management employment with extended notice")
        .with_required(fields_with(&EMPLOYMENT_REQUIRED, &["reporting_to"]))
        .with_optional(fields_with(
            &EMPLOYMENT_OPTIONAL,
            &["contract_end_date", "signing_bonus", "non_compete_months"],
        ))
        .with_constraints(
            ContractConstraints::new()
                .with_max_probation_months(6)
                .with_notice_days(Some(60), Some(180))
                .with_minimum_wage("OMR", 325.0),
        )
        .with_rule(BusinessRule::enforced(
            "Employer, executive, title, start date, salary, currency, location and reporting line must be stated",
            RuleCheck::RequiredFields,
        ))
        .with_rule(BusinessRule::enforced(
            "Probation may not exceed 6 months",
            RuleCheck::MaxProbation,
        ))
        .with_rule(BusinessRule::enforced(
            "Notice must be between 60 and 180 days",
            RuleCheck::NoticeBounds,
        ))
        .with_rule(BusinessRule::enforced(
            "Salaries paid in OMR should meet the 325 OMR minimum wage",
            RuleCheck::MinimumWage,
        ))
        .with_default("currency", json!("OMR"))
        .with_default("notice_period_days", json!(90))
        .with_template(ids::TEMPLATE_EXECUTIVE);

    vec![
        unlimited, fixed_term, part_time, internship, consulting, remote, executive,
    ]
}

/// The built-in catalog as a document, e.g. for export to JSON.
#[must_use]
pub fn builtin() -> CatalogDocument {
    CatalogDocument {
        contract_types: contract_types(),
        templates: templates(),
    }
}

fn money() -> Transform {
    Transform::Scale {
        factor: 1.0,
        decimals: Some(3),
    }
}

fn code() -> Transform {
    Transform::UppercaseAlphanumeric
}

fn employment_bindings(template: TemplateConfig) -> TemplateConfig {
    template
        .with_binding(
            "contract_number",
            Binding::field("contract_number").with_transform(code()),
            "Contract reference",
        )
        .with_binding("employer_id", Binding::field("first_party_id"), "Employer party id")
        .with_binding("employee_id", Binding::field("second_party_id"), "Employee party id")
        .with_binding("job_title", Binding::trimmed("job_title"), "Job title")
        .with_binding(
            "start_date",
            Binding::date("contract_start_date", DISPLAY_DATE),
            "Start date",
        )
        .with_binding(
            "basic_salary",
            Binding::field("basic_salary").with_transform(money()),
            "Monthly basic salary",
        )
        .with_binding(
            "currency",
            Binding::field("currency").with_transform(code()),
            "Salary currency",
        )
        .with_binding("work_location", Binding::trimmed("work_location"), "Place of work")
}

/// The built-in templates.
#[must_use]
pub fn templates() -> Vec<TemplateConfig> {
    let employment_optional = [
        "contract_number",
        "work_location",
        "department",
        "probation_period_months",
        "notice_period_days",
        "special_terms",
    ];

    let unlimited = employment_bindings(
        TemplateConfig::new(
            ids::TEMPLATE_UNLIMITED,
            "Oman Employment Contract (Unlimited)",
            LABOUR_LAW,
            "1xOmanUnlimitedEmploymentV3",
        )
        .with_required([
            "first_party_id",
            "second_party_id",
            "job_title",
            "contract_start_date",
            "basic_salary",
            "currency",
        ])
        .with_optional(fields_with(&employment_optional, &["working_hours_per_week"])),
    )
    .with_binding("department", Binding::trimmed("department"), "Department")
    .with_binding(
        "probation_months",
        Binding::field("probation_period_months"),
        "Probation in months",
    )
    .with_binding("notice_days", Binding::field("notice_period_days"), "Notice in days")
    .with_binding(
        "weekly_hours",
        Binding::field("working_hours_per_week"),
        "Weekly working hours",
    )
    .with_binding("special_terms", Binding::trimmed("special_terms"), "Special terms")
    .with_binding(
        "equipment",
        Binding::trimmed("equipment_provided"),
        "Equipment provided for remote work",
    )
    .with_output_format(OutputFormat::Both)
    .with_storage(StoragePattern::new(
        "contracts/oman/unlimited",
        "{employee_id}_{start_date}",
    ));

    let fixed_term = employment_bindings(
        TemplateConfig::new(
            ids::TEMPLATE_FIXED_TERM,
            "Oman Employment Contract (Fixed Term)",
            LABOUR_LAW,
            "1xOmanFixedTermEmploymentV2",
        )
        .with_required([
            "first_party_id",
            "second_party_id",
            "job_title",
            "contract_start_date",
            "contract_end_date",
            "basic_salary",
            "currency",
        ])
        .with_optional(fields_with(&employment_optional, &["working_hours_per_week"])),
    )
    .with_binding(
        "end_date",
        Binding::date("contract_end_date", DISPLAY_DATE),
        "End date",
    )
    .with_binding(
        "contract_period",
        Binding::concat(["contract_start_date", "contract_end_date"], " to "),
        "Contract period",
    )
    .with_binding(
        "probation_months",
        Binding::field("probation_period_months"),
        "Probation in months",
    )
    .with_binding("notice_days", Binding::field("notice_period_days"), "Notice in days")
    .with_output_format(OutputFormat::Both)
    .with_storage(StoragePattern::new(
        "contracts/oman/fixed-term",
        "{employee_id}_{start_date}_{end_date}",
    ));

    let part_time = employment_bindings(
        TemplateConfig::new(
            ids::TEMPLATE_PART_TIME,
            "Oman Employment Contract (Part Time)",
            LABOUR_LAW,
            "1xOmanPartTimeEmploymentV1",
        )
        .with_required([
            "first_party_id",
            "second_party_id",
            "job_title",
            "contract_start_date",
            "basic_salary",
            "currency",
            "working_hours_per_week",
        ])
        .with_optional(fields_with(&employment_optional, &["contract_end_date"])),
    )
    .with_binding(
        "weekly_hours",
        Binding::field("working_hours_per_week"),
        "Weekly working hours",
    )
    .with_binding(
        "end_date",
        Binding::date("contract_end_date", DISPLAY_DATE),
        "End date, if any",
    )
    .with_storage(StoragePattern::new(
        "contracts/oman/part-time",
        "{employee_id}_{start_date}",
    ));

    let consulting = TemplateConfig::new(
        ids::TEMPLATE_CONSULTING,
        "Consulting Services Agreement",
        COMMERCIAL,
        "1xConsultingServicesV1",
    )
    .with_required([
        "first_party_id",
        "second_party_id",
        "scope_of_work",
        "contract_start_date",
        "contract_end_date",
        "professional_fee",
        "currency",
    ])
    .with_optional(["contract_number", "payment_terms", "deliverables"])
    .with_binding(
        "contract_number",
        Binding::field("contract_number").with_transform(code()),
        "Agreement reference",
    )
    .with_binding("client_id", Binding::field("first_party_id"), "Client party id")
    .with_binding("consultant_id", Binding::field("second_party_id"), "Consultant party id")
    .with_binding("scope_of_work", Binding::trimmed("scope_of_work"), "Scope of work")
    .with_binding(
        "start_date",
        Binding::date("contract_start_date", DISPLAY_DATE),
        "Start date",
    )
    .with_binding(
        "end_date",
        Binding::date("contract_end_date", DISPLAY_DATE),
        "End date",
    )
    .with_binding(
        "professional_fee",
        Binding::field("professional_fee").with_transform(money()),
        "Fee",
    )
    .with_binding(
        "professional_fee_baisa",
        Binding::field("professional_fee").with_transform(Transform::Scale {
            factor: 1000.0,
            decimals: Some(0),
        }),
        "Fee in baisa",
    )
    .with_binding(
        "currency",
        Binding::field("currency").with_transform(code()),
        "Fee currency",
    )
    .with_binding("payment_terms", Binding::trimmed("payment_terms"), "Payment terms")
    .with_binding("deliverables", Binding::trimmed("deliverables"), "Deliverables")
    .with_output_format(OutputFormat::Docx);

    let executive = TemplateConfig::new(
        ids::TEMPLATE_EXECUTIVE,
        "Executive Employment Contract",
        LABOUR_LAW,
        "1xExecutiveEmploymentV1",
    )
    .with_required([
        "first_party_id",
        "second_party_id",
        "job_title",
        "contract_start_date",
        "basic_salary",
        "currency",
        "reporting_to",
    ])
    .with_optional([
        "contract_number",
        "contract_end_date",
        "signing_bonus",
        "non_compete_months",
        "notice_period_days",
        "probation_period_months",
        "special_terms",
    ])
    .with_binding(
        "contract_number",
        Binding::field("contract_number").with_transform(code()),
        "Contract reference",
    )
    .with_binding("employer_id", Binding::field("first_party_id"), "Employer party id")
    .with_binding("executive_id", Binding::field("second_party_id"), "Executive party id")
    .with_binding("job_title", Binding::trimmed("job_title"), "Job title")
    .with_binding("reporting_to", Binding::trimmed("reporting_to"), "Reports to")
    .with_binding(
        "start_date",
        Binding::date("contract_start_date", DISPLAY_DATE),
        "Start date",
    )
    .with_binding(
        "basic_salary",
        Binding::field("basic_salary").with_transform(money()),
        "Monthly basic salary",
    )
    .with_binding(
        "currency",
        Binding::field("currency").with_transform(code()),
        "Salary currency",
    )
    .with_binding(
        "signing_bonus",
        Binding::field("signing_bonus").with_transform(money()),
        "Signing bonus",
    )
    .with_binding(
        "non_compete_months",
        Binding::field("non_compete_months"),
        "Non-compete period in months",
    )
    .with_binding("notice_days", Binding::field("notice_period_days"), "Notice in days")
    .with_binding(
        "probation_months",
        Binding::field("probation_period_months"),
        "Probation in months",
    )
    .with_binding("special_terms", Binding::trimmed("special_terms"), "Special terms")
    .with_storage(StoragePattern::new(
        "contracts/executive",
        "{executive_id}_{start_date}",
    ));

    vec![unlimited, fixed_term, part_time, consulting, executive]
}
