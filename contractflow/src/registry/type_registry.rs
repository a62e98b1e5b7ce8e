//! Read-only catalog of contract type configurations.

use std::collections::BTreeMap;

use super::types::ContractTypeConfig;
use crate::errors::ConfigurationError;

/// Contract types keyed by id.
///
/// Entries are added only through [`RegistryBuilder`](super::RegistryBuilder);
/// once built the catalog exposes no mutation.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: BTreeMap<String, ContractTypeConfig>,
}

impl TypeRegistry {
    pub(crate) fn insert(&mut self, config: ContractTypeConfig) -> Result<(), ConfigurationError> {
        if self.entries.contains_key(&config.id) {
            return Err(ConfigurationError::DuplicateType { id: config.id });
        }
        self.entries.insert(config.id.clone(), config);
        Ok(())
    }

    /// Looks up a contract type.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ContractTypeConfig> {
        self.entries.get(id)
    }

    /// True if the id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All contract types, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<&ContractTypeConfig> {
        self.entries.values().collect()
    }

    /// Contract types in `category`, ordered by id.
    #[must_use]
    pub fn all_in_category(&self, category: &str) -> Vec<&ContractTypeConfig> {
        self.entries
            .values()
            .filter(|c| c.category == category)
            .collect()
    }

    /// Contract types eligible for automated document generation.
    #[must_use]
    pub fn with_templates(&self) -> Vec<&ContractTypeConfig> {
        self.entries
            .values()
            .filter(|c| c.linked_template_id.is_some())
            .collect()
    }

    /// Contract types linked to `template_id`.
    #[must_use]
    pub fn linked_to(&self, template_id: &str) -> Vec<&ContractTypeConfig> {
        self.entries
            .values()
            .filter(|c| c.linked_template_id.as_deref() == Some(template_id))
            .collect()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
