//! One-shot registry construction with startup-time consistency checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use super::catalog;
use super::snapshot::Registry;
use super::template_registry::TemplateRegistry;
use super::type_registry::TypeRegistry;
use super::types::{ContractTypeConfig, TemplateConfig};
use crate::config::EngineConfig;
use crate::errors::ConfigurationError;
use crate::validation::check_rule_coverage;

/// Serialized form of a catalog: contract types plus templates.
///
/// Both lists must be present and unknown keys are rejected, so a misspelled
/// section fails to load instead of producing an empty catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    /// Contract type definitions.
    pub contract_types: Vec<ContractTypeConfig>,
    /// Template definitions.
    pub templates: Vec<TemplateConfig>,
}

impl CatalogDocument {
    /// Parses a catalog from JSON text. The root must be an object.
    ///
    /// # Errors
    ///
    /// Returns the parse failure as a message.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let root: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if !root.is_object() {
            return Err(format!(
                "catalog root must be an object with contract_types and templates, found {}",
                json_kind(&root)
            ));
        }
        serde_json::from_value(root).map_err(|e| e.to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Collects catalog entries and builds an immutable [`Registry`].
///
/// Every misconfiguration is reported by [`RegistryBuilder::build`], so a
/// process that starts has a consistent catalog.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    types: Vec<ContractTypeConfig>,
    templates: Vec<TemplateConfig>,
    strict_rule_coverage: bool,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder preloaded with the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_catalog(catalog::builtin())
    }

    /// Creates a builder from a catalog document.
    #[must_use]
    pub fn from_catalog(document: CatalogDocument) -> Self {
        Self::new()
            .with_types(document.contract_types)
            .with_templates(document.templates)
    }

    /// Parses a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Catalog` if the document is invalid.
    pub fn from_catalog_json(json: &str) -> Result<Self, ConfigurationError> {
        let document =
            CatalogDocument::from_json_str(json).map_err(|reason| ConfigurationError::Catalog {
                source_name: "<inline catalog>".to_string(),
                reason,
            })?;
        Ok(Self::from_catalog(document))
    }

    /// Loads a JSON catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Catalog` if the file cannot be read or
    /// parsed.
    pub fn from_catalog_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let catalog_error = |reason: String| ConfigurationError::Catalog {
            source_name: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| catalog_error(e.to_string()))?;
        let document = CatalogDocument::from_json_str(&text).map_err(catalog_error)?;
        Ok(Self::from_catalog(document))
    }

    /// Adds a contract type.
    #[must_use]
    pub fn with_type(mut self, config: ContractTypeConfig) -> Self {
        self.types.push(config);
        self
    }

    /// Adds contract types.
    #[must_use]
    pub fn with_types(mut self, configs: impl IntoIterator<Item = ContractTypeConfig>) -> Self {
        self.types.extend(configs);
        self
    }

    /// Adds a template.
    #[must_use]
    pub fn with_template(mut self, config: TemplateConfig) -> Self {
        self.templates.push(config);
        self
    }

    /// Adds templates.
    #[must_use]
    pub fn with_templates(mut self, configs: impl IntoIterator<Item = TemplateConfig>) -> Self {
        self.templates.extend(configs);
        self
    }

    /// Makes business-rule drift fatal.
    #[must_use]
    pub fn strict_rule_coverage(mut self, strict: bool) -> Self {
        self.strict_rule_coverage = strict;
        self
    }

    /// Applies the registry-related settings of `config`.
    #[must_use]
    pub fn with_config(self, config: &EngineConfig) -> Self {
        self.strict_rule_coverage(config.strict_rule_coverage)
    }

    /// Validates all entries and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found: empty or duplicate ids,
    /// overlapping field lists, malformed bindings, storage patterns naming
    /// unbound variables, dangling template links, bindings to undeclared
    /// fields, or (in strict mode) business-rule drift.
    pub fn build(self) -> Result<Registry, ConfigurationError> {
        let mut templates = TemplateRegistry::default();
        for template in self.templates {
            check_id(&template.id, "template")?;
            check_fields(&template.id, &template.required_fields, &template.optional_fields)?;
            check_template_shape(&template)?;
            templates.insert(template)?;
        }

        let mut types = TypeRegistry::default();
        for config in self.types {
            check_id(&config.id, "contract type")?;
            check_fields(&config.id, &config.required_fields, &config.optional_fields)?;
            if let Some(template_id) = &config.linked_template_id {
                if !templates.contains(template_id) {
                    return Err(ConfigurationError::DanglingTemplate {
                        type_id: config.id.clone(),
                        template_id: template_id.clone(),
                    });
                }
            }
            types.insert(config)?;
        }

        for template in templates.all() {
            let linking = types.linked_to(&template.id);
            for (variable, binding) in &template.variable_bindings {
                for field in binding.fields() {
                    let known = template.recognizes(field)
                        || linking.iter().any(|config| config.recognizes(field));
                    if !known {
                        return Err(ConfigurationError::UnknownBindingField {
                            template_id: template.id.clone(),
                            variable: variable.clone(),
                            field: field.to_string(),
                        });
                    }
                }
            }
        }

        let mut coverage = Vec::with_capacity(types.len());
        for config in types.all() {
            let report = check_rule_coverage(config);
            if !report.is_clean() {
                let findings = report.findings();
                for finding in &findings {
                    warn!(contract_type = %config.id, "Business rule drift: {}", finding);
                }
                if self.strict_rule_coverage {
                    return Err(ConfigurationError::RuleDrift {
                        type_id: config.id.clone(),
                        findings,
                    });
                }
            }
            coverage.push(report);
        }

        info!(
            contract_types = types.len(),
            templates = templates.len(),
            "Contract registry built"
        );

        Ok(Registry::from_parts(types, templates, coverage))
    }
}

fn check_id(id: &str, kind: &'static str) -> Result<(), ConfigurationError> {
    if id.trim().is_empty() {
        return Err(ConfigurationError::EmptyIdentifier { kind });
    }
    Ok(())
}

fn check_fields(
    owner: &str,
    required: &[String],
    optional: &[String],
) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for field in required.iter().chain(optional) {
        if !seen.insert(field.as_str()) {
            return Err(ConfigurationError::FieldOverlap {
                owner: owner.to_string(),
                field: field.clone(),
            });
        }
    }
    Ok(())
}

fn check_template_shape(template: &TemplateConfig) -> Result<(), ConfigurationError> {
    for (variable, binding) in &template.variable_bindings {
        binding
            .check()
            .map_err(|reason| ConfigurationError::MalformedBinding {
                template_id: template.id.clone(),
                variable: variable.clone(),
                reason,
            })?;
    }

    if let Some(pattern) = &template.storage_pattern {
        for variable in pattern.variables() {
            if !template.variable_bindings.contains_key(&variable) {
                return Err(ConfigurationError::UnknownStorageVariable {
                    template_id: template.id.clone(),
                    variable,
                });
            }
        }
    }
    Ok(())
}
