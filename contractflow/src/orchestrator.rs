//! Single entry point: validate, then compile.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::compile::{Blueprint, BlueprintCompiler, PayloadCompiler, WebhookPayload};
use crate::config::EngineConfig;
use crate::errors::{CompileError, ConfigurationError, ErrorReport};
use crate::observability::SpanTimer;
use crate::registry::{Registry, RegistryBuilder, RegistryHandle};
use crate::utils::values::Record;
use crate::validation::{ValidationEngine, ValidationResult};

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Also compile the blueprint for the type's template.
    #[serde(default)]
    pub want_blueprint: bool,
}

impl ProcessOptions {
    /// Options requesting a blueprint.
    #[must_use]
    pub fn with_blueprint() -> Self {
        Self {
            want_blueprint: true,
        }
    }
}

/// Combined result of [`Orchestrator::process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Correlation id of this call, also recorded on its span.
    pub run_id: Uuid,
    /// Validation result. Always present.
    pub validation: ValidationResult,
    /// Webhook payload, when the record was valid and compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<WebhookPayload>,
    /// Blueprint, when requested and compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<Blueprint>,
    /// First compile failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    /// Fields filled from the type's default values before validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_defaults: Vec<String>,
}

impl ProcessOutcome {
    /// True when a payload is ready for dispatch.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.payload.is_some()
    }

    /// The plain error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// Runs validation and compilation against the current registry snapshot.
///
/// Every call takes one snapshot up front, so a concurrent
/// [`RegistryHandle::replace`] never yields a mixed view.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    handle: RegistryHandle,
    config: EngineConfig,
}

impl Orchestrator {
    /// Creates an orchestrator with the default configuration.
    #[must_use]
    pub fn new(handle: RegistryHandle) -> Self {
        Self::with_config(handle, EngineConfig::default())
    }

    /// Creates an orchestrator with `config`.
    #[must_use]
    pub fn with_config(handle: RegistryHandle, config: EngineConfig) -> Self {
        Self { handle, config }
    }

    /// Builds the built-in catalog under `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the catalog fails its startup checks.
    pub fn builtin(config: EngineConfig) -> Result<Self, ConfigurationError> {
        let registry = RegistryBuilder::builtin().with_config(&config).build()?;
        Ok(Self::with_config(RegistryHandle::new(registry), config))
    }

    /// The registry handle, for hot reload.
    #[must_use]
    pub fn handle(&self) -> &RegistryHandle {
        &self.handle
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates `record` as `type_id` and compiles what the result allows.
    ///
    /// The payload is compiled only for valid records. The blueprint is
    /// compiled whenever requested, whatever the record's validity. Compile
    /// failures are reported in [`ProcessOutcome::error`]; this never fails.
    pub fn process(&self, type_id: &str, record: &Record, options: ProcessOptions) -> ProcessOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("contract.process", %run_id, contract_type = %type_id);
        let _entered = span.enter();
        let timer = SpanTimer::start("contract.process");

        let registry = self.handle.snapshot();
        let (record, applied_defaults) = self.with_defaults(&registry, type_id, record);

        let validation =
            ValidationEngine::with_config(Arc::clone(&registry), &self.config).validate(type_id, &record);

        let mut error: Option<ErrorReport> = None;
        let mut keep_first = |err: CompileError| {
            warn!(code = err.code(), class = %err.class(), "{}", err);
            error.get_or_insert_with(|| err.to_report());
        };

        let payload = if validation.is_valid {
            PayloadCompiler::with_config(Arc::clone(&registry), &self.config)
                .compile(type_id, &record)
                .map_err(&mut keep_first)
                .ok()
        } else {
            None
        };

        let blueprint = if options.want_blueprint {
            BlueprintCompiler::with_config(Arc::clone(&registry), &self.config)
                .compile_for_type(type_id)
                .map_err(&mut keep_first)
                .ok()
        } else {
            None
        };

        info!(
            is_valid = validation.is_valid,
            errors = validation.errors.len(),
            warnings = validation.warnings.len(),
            payload = payload.is_some(),
            blueprint = blueprint.is_some(),
            duration_ms = timer.elapsed_ms(),
            "Processed contract record"
        );

        ProcessOutcome {
            run_id,
            validation,
            payload,
            blueprint,
            error,
            applied_defaults,
        }
    }

    fn with_defaults<'a>(
        &self,
        registry: &Registry,
        type_id: &str,
        record: &'a Record,
    ) -> (Cow<'a, Record>, Vec<String>) {
        if !self.config.apply_defaults {
            return (Cow::Borrowed(record), Vec::new());
        }
        let Some(config) = registry.types().get(type_id) else {
            return (Cow::Borrowed(record), Vec::new());
        };
        let mut owned = record.clone();
        let applied = config.apply_defaults(&mut owned);
        if applied.is_empty() {
            (Cow::Borrowed(record), applied)
        } else {
            (Cow::Owned(owned), applied)
        }
    }
}
