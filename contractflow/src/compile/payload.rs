//! Webhook payload compilation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::errors::CompileError;
use crate::registry::{OutputFormat, Registry, TemplateConfig};
use crate::utils::dates::DateParser;
use crate::utils::values::{present, Record};

/// The JSON body POSTed to the document-rendering service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Contract type id.
    pub contract_type: String,
    /// External template reference of the linked template.
    pub template_id: String,
    /// Requested output format.
    pub output_format: OutputFormat,
    /// Bound template variables.
    pub variables: BTreeMap<String, Value>,
    /// Rendered storage destination, if the template defines one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_hint: Option<String>,
}

impl WebhookPayload {
    /// Hex digest of the canonical JSON body, for use as an idempotency key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..16])
    }

    /// Looks up a bound variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Compiles validated records into webhook payloads.
///
/// The compiler does not re-run business rules. It only resolves the linked
/// template and evaluates its bindings.
#[derive(Debug, Clone)]
pub struct PayloadCompiler {
    registry: Arc<Registry>,
    dates: DateParser,
}

impl PayloadCompiler {
    /// Creates a compiler with the default date formats.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, &EngineConfig::default())
    }

    /// Creates a compiler using `config`'s accepted date formats.
    #[must_use]
    pub fn with_config(registry: Arc<Registry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            dates: config.date_parser(),
        }
    }

    /// Compiles `record` for the template linked to `type_id`.
    ///
    /// # Errors
    ///
    /// Returns `CompileError` if the type or its template cannot be
    /// resolved, a required template field is absent, or a transform fails.
    pub fn compile(&self, type_id: &str, record: &Record) -> Result<WebhookPayload, CompileError> {
        let template = self.registry.linked_template(type_id)?;
        let variables = bind_variables(template, record, &self.dates)?;
        let storage_hint = template
            .storage_pattern
            .as_ref()
            .map(|pattern| pattern.render(&variables));

        debug!(
            contract_type = %type_id,
            template_id = %template.id,
            variables = variables.len(),
            "Compiled webhook payload"
        );

        Ok(WebhookPayload {
            contract_type: type_id.to_string(),
            template_id: template.external_template_ref.clone(),
            output_format: template.output_format,
            variables,
            storage_hint,
        })
    }
}

/// Evaluates every binding of `template` against `record`.
///
/// Variables whose inputs are all absent are omitted. An absent field the
/// template requires is a consistency failure.
///
/// # Errors
///
/// Returns `MissingRequiredField` or `TransformFailed`.
pub fn bind_variables(
    template: &TemplateConfig,
    record: &Record,
    dates: &DateParser,
) -> Result<BTreeMap<String, Value>, CompileError> {
    let mut variables = BTreeMap::new();

    for (variable, binding) in &template.variable_bindings {
        if let Some(field) = binding
            .fields()
            .into_iter()
            .find(|f| template.requires(f) && present(record, f).is_none())
        {
            error!(
                template_id = %template.id,
                variable = %variable,
                field = %field,
                "Required template field absent from a validated record"
            );
            return Err(CompileError::MissingRequiredField {
                template_id: template.id.clone(),
                variable: variable.clone(),
                field: field.to_string(),
            });
        }

        let value = binding
            .evaluate(record, dates)
            .map_err(|e| CompileError::TransformFailed {
                variable: variable.clone(),
                reason: e.to_string(),
            })?;
        if let Some(value) = value {
            variables.insert(variable.clone(), value);
        }
    }

    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Binding;
    use crate::registry::{ContractTypeConfig, RegistryBuilder, StoragePattern};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Arc<Registry> {
        let template = TemplateConfig::new("tpl", "Letter", "general", "ext-42")
            .with_required(["name", "start"])
            .with_optional(["code"])
            .with_binding("name", Binding::trimmed("name"), "Name")
            .with_binding("start", Binding::date("start", "%d.%m.%Y"), "Start")
            .with_binding(
                "code",
                Binding::field("code").with_transform(crate::bindings::Transform::UppercaseAlphanumeric),
                "Code",
            )
            .with_storage(StoragePattern::new("letters/", "{name}_{code}"));
        let linked = ContractTypeConfig::new("letter", "Letter", "general")
            .with_required(["name", "start"])
            .with_template("tpl");
        let unlinked = ContractTypeConfig::new("memo", "Memo", "general");

        Arc::new(
            RegistryBuilder::new()
                .with_template(template)
                .with_type(linked)
                .with_type(unlinked)
                .build()
                .unwrap(),
        )
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_compile_binds_and_renders_storage() {
        let compiler = PayloadCompiler::new(registry());
        let payload = compiler
            .compile(
                "letter",
                &record(json!({"name": "  Salim ", "start": "2024-02-01", "code": "ab-12"})),
            )
            .unwrap();

        assert_eq!(payload.contract_type, "letter");
        assert_eq!(payload.template_id, "ext-42");
        assert_eq!(payload.output_format, OutputFormat::Pdf);
        assert_eq!(payload.variable("name"), Some(&json!("Salim")));
        assert_eq!(payload.variable("start"), Some(&json!("01.02.2024")));
        assert_eq!(payload.variable("code"), Some(&json!("AB12")));
        assert_eq!(payload.storage_hint.as_deref(), Some("letters/Salim_AB12"));
    }

    #[test]
    fn test_absent_optional_is_omitted() {
        let compiler = PayloadCompiler::new(registry());
        let payload = compiler
            .compile("letter", &record(json!({"name": "Salim", "start": "2024-02-01"})))
            .unwrap();

        assert!(!payload.variables.contains_key("code"));
        assert_eq!(payload.storage_hint.as_deref(), Some("letters/Salim_"));
    }

    #[test]
    fn test_absent_required_is_inconsistency() {
        let compiler = PayloadCompiler::new(registry());
        let err = compiler
            .compile("letter", &record(json!({"name": "Salim"})))
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingRequiredField {
                template_id: "tpl".to_string(),
                variable: "start".to_string(),
                field: "start".to_string(),
            }
        );
    }

    #[test]
    fn test_transform_failure() {
        let compiler = PayloadCompiler::new(registry());
        let err = compiler
            .compile("letter", &record(json!({"name": "Salim", "start": "soon"})))
            .unwrap_err();
        assert!(matches!(err, CompileError::TransformFailed { ref variable, .. } if variable == "start"));
    }

    #[test]
    fn test_lookup_failures() {
        let compiler = PayloadCompiler::new(registry());
        let empty = Record::new();

        let err = compiler.compile("memo", &empty).unwrap_err();
        assert!(err.to_string().contains("no template linked"));

        let err = compiler.compile("nope", &empty).unwrap_err();
        assert!(matches!(err, CompileError::UnknownContractType { .. }));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let compiler = PayloadCompiler::new(registry());
        let input = record(json!({"name": "Salim", "start": "2024-02-01"}));
        let a = compiler.compile("letter", &input).unwrap();
        let b = compiler.compile("letter", &input).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 32);

        let other = compiler
            .compile("letter", &record(json!({"name": "Aisha", "start": "2024-02-01"})))
            .unwrap();
        assert_ne!(a.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_wire_shape() {
        let payload = WebhookPayload {
            contract_type: "letter".to_string(),
            template_id: "ext-42".to_string(),
            output_format: OutputFormat::Both,
            variables: BTreeMap::from([("name".to_string(), json!("Salim"))]),
            storage_hint: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "contract_type": "letter",
                "template_id": "ext-42",
                "output_format": "both",
                "variables": {"name": "Salim"}
            })
        );
    }
}
