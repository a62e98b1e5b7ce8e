//! Declarative automation blueprints for the external workflow runner.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::errors::CompileError;
use crate::registry::{Registry, TemplateConfig};

/// Kind of a blueprint stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Receive the webhook payload.
    WebhookReceive,
    /// Load the contract record.
    FetchRecord,
    /// Fill the external template.
    RenderTemplate,
    /// Export the rendered document.
    ExportDocument,
    /// Store the exported file.
    StoreArtifact,
    /// Write generation status back to the record.
    PatchRecord,
}

impl StageKind {
    /// The fixed pipeline order.
    pub const PIPELINE: [Self; 6] = [
        Self::WebhookReceive,
        Self::FetchRecord,
        Self::RenderTemplate,
        Self::ExportDocument,
        Self::StoreArtifact,
        Self::PatchRecord,
    ];
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WebhookReceive => "webhook_receive",
            Self::FetchRecord => "fetch_record",
            Self::RenderTemplate => "render_template",
            Self::ExportDocument => "export_document",
            Self::StoreArtifact => "store_artifact",
            Self::PatchRecord => "patch_record",
        };
        write!(f, "{name}")
    }
}

/// One step of a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// 1-based position.
    pub order: u32,
    /// Stage kind.
    pub kind: StageKind,
    /// Stage-specific parameters.
    pub parameters: Map<String, Value>,
}

/// An ordered stage list for one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Display name.
    pub name: String,
    /// Stages in execution order.
    pub stages: Vec<Stage>,
}

impl Blueprint {
    /// Returns the stage of the given kind.
    #[must_use]
    pub fn stage(&self, kind: StageKind) -> Option<&Stage> {
        self.stages.iter().find(|s| s.kind == kind)
    }
}

/// Status written to the record by the final stage.
pub const GENERATED_STATUS: &str = "generated";

/// Builds blueprints from registered templates.
#[derive(Debug, Clone)]
pub struct BlueprintCompiler {
    registry: Arc<Registry>,
    name_suffix: String,
}

impl BlueprintCompiler {
    /// Creates a compiler with the default name suffix.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, &EngineConfig::default())
    }

    /// Creates a compiler using `config`'s blueprint name suffix.
    #[must_use]
    pub fn with_config(registry: Arc<Registry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            name_suffix: config.blueprint_name_suffix.clone(),
        }
    }

    /// Compiles the blueprint for `template_id`.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::TemplateNotFound` if the template is unknown.
    pub fn compile_blueprint(&self, template_id: &str) -> Result<Blueprint, CompileError> {
        let template = self.registry.template(template_id)?;
        Ok(blueprint_for(template, &self.name_suffix))
    }

    /// Compiles the blueprint for the template linked to `type_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownContractType`, `NoTemplateLinked` or
    /// `TemplateNotFound`.
    pub fn compile_for_type(&self, type_id: &str) -> Result<Blueprint, CompileError> {
        let template = self.registry.linked_template(type_id)?;
        Ok(blueprint_for(template, &self.name_suffix))
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Builds the six-stage blueprint for `template`. Pure.
#[must_use]
pub fn blueprint_for(template: &TemplateConfig, name_suffix: &str) -> Blueprint {
    let name = if name_suffix.is_empty() {
        template.name.clone()
    } else {
        format!("{} {}", template.name, name_suffix)
    };

    let bindings = serde_json::to_value(&template.variable_bindings).unwrap_or(Value::Null);

    let mut store = object(json!({
        "destination": "document_storage",
        "output_format": template.output_format,
    }));
    if let Some(pattern) = &template.storage_pattern {
        store.insert(
            "naming".to_string(),
            json!({ "folder": pattern.folder, "filename": pattern.filename }),
        );
    }

    let parameters = [
        object(json!({
            "template_id": template.id,
            "accepts": ["contract_type", "template_id", "output_format", "variables", "storage_hint"],
        })),
        object(json!({
            "source": "contract_store",
            "lookup": "by_id",
        })),
        object(json!({
            "template_ref": template.external_template_ref,
            "output_format": template.output_format,
            "bindings": bindings,
        })),
        object(json!({
            "formats": template.output_format.exports(),
        })),
        store,
        object(json!({
            "target": "contract_store",
            "set": { "document_status": GENERATED_STATUS },
        })),
    ];

    let stages = StageKind::PIPELINE
        .into_iter()
        .zip(parameters)
        .zip(1u32..)
        .map(|((kind, parameters), order)| Stage {
            order,
            kind,
            parameters,
        })
        .collect();

    Blueprint { name, stages }
}
