//! Contract type and template registries.
//!
//! This module provides:
//! - Configuration records for contract types and templates
//! - The read-only type and template catalogs
//! - A builder that checks catalog consistency at startup
//! - Immutable snapshots behind a swappable handle
//! - The built-in catalog

mod builder;
pub mod catalog;
mod snapshot;
mod template_registry;
mod type_registry;
mod types;

pub use builder::{CatalogDocument, RegistryBuilder};
pub use snapshot::{Registry, RegistryHandle};
pub use template_registry::TemplateRegistry;
pub use type_registry::TypeRegistry;
pub use types::{
    BusinessRule, ContractConstraints, ContractTypeConfig, OutputFormat, RuleCheck,
    StoragePattern, TemplateConfig,
};
