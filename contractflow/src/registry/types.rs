//! Contract type and template configuration records.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::bindings::Binding;
use crate::utils::values::{is_blank, value_text, Record};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap()
});

/// The validator check a business rule statement documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCheck {
    /// Required field presence.
    RequiredFields,
    /// End date must follow start date.
    DateOrder,
    /// `max_duration_months`.
    MaxDuration,
    /// `min_duration_months`.
    MinDuration,
    /// `allows_salary = false`.
    SalaryDisallowed,
    /// `minimum_wage` floors.
    MinimumWage,
    /// `max_weekly_hours`.
    MaxWeeklyHours,
    /// `max_probation_months`.
    MaxProbation,
    /// `allows_probation = false`.
    ProbationDisallowed,
    /// `min_notice_days` / `max_notice_days`.
    NoticeBounds,
    /// `allows_remote_work = false`.
    RemoteWorkDisallowed,
}

impl fmt::Display for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequiredFields => "required_fields",
            Self::DateOrder => "date_order",
            Self::MaxDuration => "max_duration",
            Self::MinDuration => "min_duration",
            Self::SalaryDisallowed => "salary_disallowed",
            Self::MinimumWage => "minimum_wage",
            Self::MaxWeeklyHours => "max_weekly_hours",
            Self::MaxProbation => "max_probation",
            Self::ProbationDisallowed => "probation_disallowed",
            Self::NoticeBounds => "notice_bounds",
            Self::RemoteWorkDisallowed => "remote_work_disallowed",
        };
        write!(f, "{name}")
    }
}

/// A human-readable business rule, optionally tied to the check enforcing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessRule {
    /// Rule text as shown to legal reviewers.
    pub statement: String,
    /// The validator check that enforces the rule, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforced_by: Option<RuleCheck>,
}

impl BusinessRule {
    /// Creates a rule enforced by `check`.
    #[must_use]
    pub fn enforced(statement: impl Into<String>, check: RuleCheck) -> Self {
        Self {
            statement: statement.into(),
            enforced_by: Some(check),
        }
    }

    /// Creates a documentation-only rule.
    #[must_use]
    pub fn documented(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            enforced_by: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Structured limits enforced by the validation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractConstraints {
    /// Longest allowed contract, in months.
    #[serde(default)]
    pub max_duration_months: Option<u32>,
    /// Shortest allowed contract, in months.
    #[serde(default)]
    pub min_duration_months: Option<u32>,
    /// Whether a salary is expected on this type.
    #[serde(default = "default_true")]
    pub allows_salary: bool,
    /// Whether a probation period may be agreed.
    #[serde(default = "default_true")]
    pub allows_probation: bool,
    /// Whether the work may be performed remotely.
    #[serde(default = "default_true")]
    pub allows_remote_work: bool,
    /// Weekly working-hours ceiling.
    #[serde(default)]
    pub max_weekly_hours: Option<f64>,
    /// Probation ceiling, in months.
    #[serde(default)]
    pub max_probation_months: Option<u32>,
    /// Shortest notice period, in days.
    #[serde(default)]
    pub min_notice_days: Option<u32>,
    /// Longest notice period, in days.
    #[serde(default)]
    pub max_notice_days: Option<u32>,
    /// Minimum monthly wage per ISO currency code.
    #[serde(default)]
    pub minimum_wage: BTreeMap<String, f64>,
}

impl Default for ContractConstraints {
    fn default() -> Self {
        Self {
            max_duration_months: None,
            min_duration_months: None,
            allows_salary: true,
            allows_probation: true,
            allows_remote_work: true,
            max_weekly_hours: None,
            max_probation_months: None,
            min_notice_days: None,
            max_notice_days: None,
            minimum_wage: BTreeMap::new(),
        }
    }
}

impl ContractConstraints {
    /// Creates unrestricted constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duration bounds.
    #[must_use]
    pub fn with_duration_months(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_duration_months = min;
        self.max_duration_months = max;
        self
    }

    /// Sets the weekly hours ceiling.
    #[must_use]
    pub fn with_max_weekly_hours(mut self, hours: f64) -> Self {
        self.max_weekly_hours = Some(hours);
        self
    }

    /// Sets the probation ceiling.
    #[must_use]
    pub fn with_max_probation_months(mut self, months: u32) -> Self {
        self.max_probation_months = Some(months);
        self
    }

    /// Sets the notice-period bounds.
    #[must_use]
    pub fn with_notice_days(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_notice_days = min;
        self.max_notice_days = max;
        self
    }

    /// Adds a minimum wage floor for a currency.
    #[must_use]
    pub fn with_minimum_wage(mut self, currency: impl Into<String>, amount: f64) -> Self {
        self.minimum_wage
            .insert(currency.into().to_uppercase(), amount);
        self
    }

    /// Marks salary as not expected.
    #[must_use]
    pub fn without_salary(mut self) -> Self {
        self.allows_salary = false;
        self
    }

    /// Disallows probation periods.
    #[must_use]
    pub fn without_probation(mut self) -> Self {
        self.allows_probation = false;
        self
    }

    /// Disallows remote work.
    #[must_use]
    pub fn without_remote_work(mut self) -> Self {
        self.allows_remote_work = false;
        self
    }
}

/// Configuration for one contract type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractTypeConfig {
    /// Unique type id.
    pub id: String,
    /// Display name used in validation messages.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Grouping label, e.g. the jurisdictional regime.
    pub category: String,
    /// Fields every record must carry.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Fields a record may carry.
    #[serde(default)]
    pub optional_fields: Vec<String>,
    /// Business rules, in display order.
    #[serde(default)]
    pub business_rules: Vec<BusinessRule>,
    /// Enforced limits.
    #[serde(default)]
    pub constraints: ContractConstraints,
    /// Values applied to absent fields.
    #[serde(default)]
    pub default_values: BTreeMap<String, Value>,
    /// Rendering template for automated document generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_template_id: Option<String>,
}

impl ContractTypeConfig {
    /// Creates a type with no fields or rules.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
            business_rules: Vec::new(),
            constraints: ContractConstraints::default(),
            default_values: BTreeMap::new(),
            linked_template_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the required fields.
    #[must_use]
    pub fn with_required(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the optional fields.
    #[must_use]
    pub fn with_optional(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.optional_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a business rule.
    #[must_use]
    pub fn with_rule(mut self, rule: BusinessRule) -> Self {
        self.business_rules.push(rule);
        self
    }

    /// Sets the constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: ContractConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Adds a default value.
    #[must_use]
    pub fn with_default(mut self, field: impl Into<String>, value: Value) -> Self {
        self.default_values.insert(field.into(), value);
        self
    }

    /// Links a rendering template.
    #[must_use]
    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.linked_template_id = Some(template_id.into());
        self
    }

    /// True if `field` is declared as required or optional.
    #[must_use]
    pub fn recognizes(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| f == field)
            || self.optional_fields.iter().any(|f| f == field)
    }

    /// Fills absent, null or blank fields from `default_values`.
    ///
    /// Returns the names of the fields that were filled.
    pub fn apply_defaults(&self, record: &mut Record) -> Vec<String> {
        let mut applied = Vec::new();
        for (field, value) in &self.default_values {
            if record.get(field).map_or(true, is_blank) {
                record.insert(field.clone(), value.clone());
                applied.push(field.clone());
            }
        }
        applied
    }
}

/// Document output format of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PDF only.
    #[default]
    Pdf,
    /// Word document only.
    Docx,
    /// Both PDF and Word.
    Both,
}

impl OutputFormat {
    /// The concrete file formats to export.
    #[must_use]
    pub fn exports(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Docx => &["docx"],
            Self::Both => &["pdf", "docx"],
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Destination naming for generated documents.
///
/// `{variable}` placeholders in either part are replaced by bound variable
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoragePattern {
    /// Folder reference.
    pub folder: String,
    /// File name pattern, without extension.
    pub filename: String,
}

impl StoragePattern {
    /// Creates a pattern.
    #[must_use]
    pub fn new(folder: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            filename: filename.into(),
        }
    }

    /// Placeholder names in order of appearance, folder first.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(&self.folder)
            .chain(PLACEHOLDER.captures_iter(&self.filename))
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Renders `folder/filename`. Unbound placeholders render empty.
    ///
    /// Substituted values cannot add path segments: separators become `-`
    /// and `..` collapses to `.`.
    #[must_use]
    pub fn render(&self, variables: &BTreeMap<String, Value>) -> String {
        let fill = |text: &str| {
            PLACEHOLDER
                .replace_all(text, |caps: &regex::Captures<'_>| {
                    variables
                        .get(&caps[1])
                        .map(|v| path_segment(&value_text(v)))
                        .unwrap_or_default()
                })
                .into_owned()
        };
        let folder = fill(&self.folder);
        let filename = fill(&self.filename);
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            filename
        } else {
            format!("{folder}/{filename}")
        }
    }
}

fn path_segment(text: &str) -> String {
    let mut segment = text.replace(['/', '\\'], "-");
    while segment.contains("..") {
        segment = segment.replace("..", ".");
    }
    segment
}

/// Configuration for one rendering template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Unique template id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grouping label.
    pub category: String,
    /// Opaque id of the external document template.
    pub external_template_ref: String,
    /// Placeholder token to description, for documentation.
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,
    /// Fields the template cannot render without.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Fields the template renders when present.
    #[serde(default)]
    pub optional_fields: Vec<String>,
    /// Output variable to binding.
    #[serde(default)]
    pub variable_bindings: BTreeMap<String, Binding>,
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Destination naming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_pattern: Option<StoragePattern>,
}

impl TemplateConfig {
    /// Creates a template with no fields or bindings.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        external_template_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            external_template_ref: external_template_ref.into(),
            placeholders: BTreeMap::new(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
            variable_bindings: BTreeMap::new(),
            output_format: OutputFormat::default(),
            storage_pattern: None,
        }
    }

    /// Sets the required fields.
    #[must_use]
    pub fn with_required(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the optional fields.
    #[must_use]
    pub fn with_optional(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.optional_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a binding and documents its placeholder.
    #[must_use]
    pub fn with_binding(
        mut self,
        variable: impl Into<String>,
        binding: Binding,
        description: impl Into<String>,
    ) -> Self {
        let variable = variable.into();
        self.placeholders
            .insert(format!("{{{{{variable}}}}}"), description.into());
        self.variable_bindings.insert(variable, binding);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Sets the storage pattern.
    #[must_use]
    pub fn with_storage(mut self, pattern: StoragePattern) -> Self {
        self.storage_pattern = Some(pattern);
        self
    }

    /// True if `field` is one of the template's required fields.
    #[must_use]
    pub fn requires(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| f == field)
    }

    /// True if `field` is declared as required or optional.
    #[must_use]
    pub fn recognizes(&self, field: &str) -> bool {
        self.requires(field) || self.optional_fields.iter().any(|f| f == field)
    }
}
