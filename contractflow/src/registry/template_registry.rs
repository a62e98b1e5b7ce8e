//! Read-only catalog of rendering template configurations.

use std::collections::BTreeMap;

use super::types::TemplateConfig;
use crate::errors::ConfigurationError;

/// Templates keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, TemplateConfig>,
}

impl TemplateRegistry {
    pub(crate) fn insert(&mut self, config: TemplateConfig) -> Result<(), ConfigurationError> {
        if self.entries.contains_key(&config.id) {
            return Err(ConfigurationError::DuplicateTemplate { id: config.id });
        }
        self.entries.insert(config.id.clone(), config);
        Ok(())
    }

    /// Looks up a template.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TemplateConfig> {
        self.entries.get(id)
    }

    /// True if the id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All templates, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<&TemplateConfig> {
        self.entries.values().collect()
    }

    /// Templates in `category`, ordered by id.
    #[must_use]
    pub fn all_in_category(&self, category: &str) -> Vec<&TemplateConfig> {
        self.entries
            .values()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Returns the number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no templates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_and_category() {
        let mut registry = TemplateRegistry::default();
        registry
            .insert(TemplateConfig::new("t1", "One", "employment", "ext-1"))
            .unwrap();
        registry
            .insert(TemplateConfig::new("t2", "Two", "commercial", "ext-2"))
            .unwrap();

        assert_eq!(registry.get("t1").map(|t| t.external_template_ref.as_str()), Some("ext-1"));
        assert!(registry.contains("t2"));
        assert_eq!(registry.all_in_category("commercial").len(), 1);
        assert_eq!(registry.all().len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_duplicate_template_is_rejected() {
        let mut registry = TemplateRegistry::default();
        registry
            .insert(TemplateConfig::new("t1", "One", "c", "ext-1"))
            .unwrap();
        let err = registry
            .insert(TemplateConfig::new("t1", "Other", "c", "ext-9"))
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateTemplate { id: "t1".to_string() });
    }
}
