//! # Contractflow
//!
//! Configuration-driven validation and document-pipeline compilation for
//! contract types.
//!
//! Contractflow turns a catalog of contract types and document templates
//! into:
//!
//! - **Validation**: required fields, duration, working hours, wage floors,
//!   probation and notice limits, with deterministic error and warning lists
//! - **Webhook payloads**: variables bound from a contract record through the
//!   template's declared bindings, ready for a document generator
//! - **Blueprints**: the six-stage pipeline that receives, renders, exports,
//!   stores and marks a generated document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contractflow::prelude::*;
//!
//! let orchestrator = Orchestrator::builtin(EngineConfig::default())?;
//! let record = RecordBuilder::employment().build();
//! let outcome = orchestrator.process(
//!     "oman-unlimited-makecom",
//!     &record,
//!     ProcessOptions::with_blueprint(),
//! );
//! assert!(outcome.is_ready());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod bindings;
pub mod compile;
pub mod config;
pub mod errors;
pub mod observability;
pub mod orchestrator;
pub mod ports;
pub mod registry;
pub mod service;
pub mod testing;
pub mod utils;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bindings::{Binding, BindingSource, Transform};
    pub use crate::compile::{
        Blueprint, BlueprintCompiler, PayloadCompiler, Stage, StageKind, WebhookPayload,
    };
    pub use crate::config::EngineConfig;
    pub use crate::errors::{
        CompileError, ConfigurationError, EngineError, ErrorClass, ErrorReport, PortError,
    };
    pub use crate::orchestrator::{Orchestrator, ProcessOptions, ProcessOutcome};
    pub use crate::ports::{ContractStore, DocumentDispatcher, RecordFilter, StoredContract};
    pub use crate::registry::{
        ContractTypeConfig, Registry, RegistryBuilder, RegistryHandle, TemplateConfig,
    };
    pub use crate::service::{DocumentGenerationService, DocumentStatus, ServiceTimeouts};
    pub use crate::testing::RecordBuilder;
    pub use crate::utils::Record;
    pub use crate::validation::{DurationPolicy, ValidationEngine, ValidationResult};
}
