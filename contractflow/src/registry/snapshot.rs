//! Immutable registry snapshots and the swappable handle that serves them.

use parking_lot::RwLock;
use std::sync::Arc;

use super::builder::RegistryBuilder;
use super::template_registry::TemplateRegistry;
use super::type_registry::TypeRegistry;
use super::types::{ContractTypeConfig, TemplateConfig};
use crate::errors::{CompileError, ConfigurationError};
use crate::validation::RuleCoverageReport;

/// A consistent, read-only view of both catalogs.
#[derive(Debug, Clone)]
pub struct Registry {
    types: TypeRegistry,
    templates: TemplateRegistry,
    coverage: Vec<RuleCoverageReport>,
}

impl Registry {
    pub(crate) fn from_parts(
        types: TypeRegistry,
        templates: TemplateRegistry,
        coverage: Vec<RuleCoverageReport>,
    ) -> Self {
        Self {
            types,
            templates,
            coverage,
        }
    }

    /// Builds the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the built-in catalog is inconsistent.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        RegistryBuilder::builtin().build()
    }

    /// The contract type catalog.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The template catalog.
    #[must_use]
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Rule coverage reports computed at build time, one per type.
    #[must_use]
    pub fn rule_coverage(&self) -> &[RuleCoverageReport] {
        &self.coverage
    }

    /// Contract types eligible for automated document generation.
    #[must_use]
    pub fn types_with_templates(&self) -> Vec<&ContractTypeConfig> {
        self.types.with_templates()
    }

    /// Contract types rendered with `template_id`.
    #[must_use]
    pub fn types_linked_to(&self, template_id: &str) -> Vec<&ContractTypeConfig> {
        self.types.linked_to(template_id)
    }

    /// Resolves a contract type.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::UnknownContractType` if it is not registered.
    pub fn contract_type(&self, type_id: &str) -> Result<&ContractTypeConfig, CompileError> {
        self.types
            .get(type_id)
            .ok_or_else(|| CompileError::UnknownContractType {
                type_id: type_id.to_string(),
            })
    }

    /// Resolves a template.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::TemplateNotFound` if it is not registered.
    pub fn template(&self, template_id: &str) -> Result<&TemplateConfig, CompileError> {
        self.templates
            .get(template_id)
            .ok_or_else(|| CompileError::TemplateNotFound {
                template_id: template_id.to_string(),
            })
    }

    /// Resolves the template linked to a contract type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownContractType`, `NoTemplateLinked` or
    /// `TemplateNotFound`.
    pub fn linked_template(&self, type_id: &str) -> Result<&TemplateConfig, CompileError> {
        let config = self.contract_type(type_id)?;
        let template_id =
            config
                .linked_template_id
                .as_deref()
                .ok_or_else(|| CompileError::NoTemplateLinked {
                    type_id: type_id.to_string(),
                })?;
        self.template(template_id)
    }
}

/// Shared handle to the current registry snapshot.
///
/// Readers take an `Arc` snapshot and keep using it for the whole call;
/// [`RegistryHandle::replace`] swaps the pointer so later readers see the
/// new catalog while in-flight calls finish on the old one.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    current: Arc<RwLock<Arc<Registry>>>,
}

impl RegistryHandle {
    /// Wraps a registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Registry> {
        Arc::clone(&self.current.read())
    }

    /// Installs a new snapshot and returns the previous one.
    pub fn replace(&self, registry: Registry) -> Arc<Registry> {
        let next = Arc::new(registry);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(
            contract_types = self.current.read().types().len(),
            "Contract registry snapshot replaced"
        );
        previous
    }
}

impl From<Registry> for RegistryHandle {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}
