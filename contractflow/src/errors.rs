//! Error types for the contractflow engine.
//!
//! Configuration errors abort startup. Validation findings are not errors at
//! all; they are plain data on
//! [`ValidationResult`](crate::validation::ValidationResult). Compile errors
//! signal lookup failures or registry inconsistencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error codes surfaced in [`ErrorReport`]s and logs.
pub mod codes {
    /// Duplicate contract type or template id.
    pub const DUPLICATE_ID: &str = "CONTRACT-CFG-DUPLICATE";
    /// Empty identifier in a catalog entry.
    pub const EMPTY_ID: &str = "CONTRACT-CFG-EMPTY_ID";
    /// A field is listed twice, or as both required and optional.
    pub const FIELD_OVERLAP: &str = "CONTRACT-CFG-FIELD_OVERLAP";
    /// A `linked_template_id` does not resolve.
    pub const DANGLING_TEMPLATE: &str = "CONTRACT-CFG-DANGLING_TEMPLATE";
    /// A binding references an unknown field or is malformed.
    pub const BAD_BINDING: &str = "CONTRACT-CFG-BINDING";
    /// A storage pattern references an unbound variable.
    pub const BAD_STORAGE_PATTERN: &str = "CONTRACT-CFG-STORAGE";
    /// Documented business rules and enforced checks have drifted apart.
    pub const RULE_DRIFT: &str = "CONTRACT-CFG-RULE_DRIFT";
    /// A catalog or config document could not be read or parsed.
    pub const CATALOG: &str = "CONTRACT-CFG-CATALOG";
    /// Unknown contract type.
    pub const UNKNOWN_TYPE: &str = "CONTRACT-LOOKUP-TYPE";
    /// Contract type has no linked template.
    pub const NO_TEMPLATE: &str = "CONTRACT-LOOKUP-NO_TEMPLATE";
    /// Linked template is not registered.
    pub const TEMPLATE_NOT_FOUND: &str = "CONTRACT-LOOKUP-TEMPLATE";
    /// A required binding field was absent after validation passed.
    pub const INCONSISTENT: &str = "CONTRACT-COMPILE-INCONSISTENT";
    /// A bound value could not be transformed.
    pub const TRANSFORM: &str = "CONTRACT-COMPILE-TRANSFORM";
}

/// Coarse classification used by monitoring to separate bad input from bad
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Operator or programmer error in the registries.
    Configuration,
    /// A requested contract type or template does not exist.
    NotFound,
    /// A registry invariant was violated at compile time.
    Inconsistency,
    /// A record value could not be transformed by a binding.
    Transform,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::NotFound => write!(f, "not_found"),
            Self::Inconsistency => write!(f, "inconsistency"),
            Self::Transform => write!(f, "transform"),
        }
    }
}

/// The single reportable error shape handed to callers of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Stable error code from [`codes`].
    pub code: String,
    /// Error class.
    pub class: ErrorClass,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Fatal registry misconfiguration detected while building the registries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Two contract types share an id.
    #[error("duplicate contract type id '{id}'")]
    DuplicateType {
        /// The duplicated id.
        id: String,
    },

    /// Two templates share an id.
    #[error("duplicate template id '{id}'")]
    DuplicateTemplate {
        /// The duplicated id.
        id: String,
    },

    /// A catalog entry has an empty or whitespace-only id.
    #[error("{kind} id cannot be empty or whitespace-only")]
    EmptyIdentifier {
        /// Entry kind ("contract type" or "template").
        kind: &'static str,
    },

    /// A field appears twice across the required/optional lists.
    #[error("{owner} lists field '{field}' more than once across required and optional fields")]
    FieldOverlap {
        /// Owning type or template id.
        owner: String,
        /// The repeated field.
        field: String,
    },

    /// A contract type links to a template that is not registered.
    #[error("contract type '{type_id}' links to unknown template '{template_id}'")]
    DanglingTemplate {
        /// Contract type id.
        type_id: String,
        /// Missing template id.
        template_id: String,
    },

    /// A binding references a field that neither the template nor any
    /// linking contract type declares.
    #[error("template '{template_id}' binds '{variable}' to unknown field '{field}'")]
    UnknownBindingField {
        /// Template id.
        template_id: String,
        /// Output variable name.
        variable: String,
        /// Unknown input field.
        field: String,
    },

    /// A binding is structurally invalid.
    #[error("template '{template_id}' has a malformed binding for '{variable}': {reason}")]
    MalformedBinding {
        /// Template id.
        template_id: String,
        /// Output variable name.
        variable: String,
        /// Reason.
        reason: String,
    },

    /// A storage pattern placeholder is not a bound variable.
    #[error("template '{template_id}' storage pattern references unbound variable '{variable}'")]
    UnknownStorageVariable {
        /// Template id.
        template_id: String,
        /// Placeholder name.
        variable: String,
    },

    /// Business rules and enforced checks disagree (strict coverage only).
    #[error("contract type '{type_id}' has business rule drift: {}", findings.join("; "))]
    RuleDrift {
        /// Contract type id.
        type_id: String,
        /// Individual drift findings.
        findings: Vec<String>,
    },

    /// A catalog or config document could not be loaded.
    #[error("failed to load {source_name}: {reason}")]
    Catalog {
        /// File path or "<inline>".
        source_name: String,
        /// Parse or IO failure.
        reason: String,
    },
}

impl ConfigurationError {
    /// Returns the stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateType { .. } | Self::DuplicateTemplate { .. } => codes::DUPLICATE_ID,
            Self::EmptyIdentifier { .. } => codes::EMPTY_ID,
            Self::FieldOverlap { .. } => codes::FIELD_OVERLAP,
            Self::DanglingTemplate { .. } => codes::DANGLING_TEMPLATE,
            Self::UnknownBindingField { .. } | Self::MalformedBinding { .. } => codes::BAD_BINDING,
            Self::UnknownStorageVariable { .. } => codes::BAD_STORAGE_PATTERN,
            Self::RuleDrift { .. } => codes::RULE_DRIFT,
            Self::Catalog { .. } => codes::CATALOG,
        }
    }
}

/// Errors raised while compiling payloads or blueprints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The contract type is not registered.
    #[error("unknown contract type '{type_id}'")]
    UnknownContractType {
        /// Requested type id.
        type_id: String,
    },

    /// The contract type has no linked template.
    #[error("no template linked to contract type '{type_id}'")]
    NoTemplateLinked {
        /// Contract type id.
        type_id: String,
    },

    /// The template is not registered.
    #[error("template not found: '{template_id}'")]
    TemplateNotFound {
        /// Requested template id.
        template_id: String,
    },

    /// A required template field is absent from a record that passed
    /// validation.
    #[error(
        "consistency check failed: template '{template_id}' requires field '{field}' \
         for variable '{variable}' but the record does not provide it"
    )]
    MissingRequiredField {
        /// Template id.
        template_id: String,
        /// Output variable.
        variable: String,
        /// Missing input field.
        field: String,
    },

    /// A bound value could not be transformed.
    #[error("cannot compute variable '{variable}': {reason}")]
    TransformFailed {
        /// Output variable.
        variable: String,
        /// Reason.
        reason: String,
    },
}

impl CompileError {
    /// Returns the stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownContractType { .. } => codes::UNKNOWN_TYPE,
            Self::NoTemplateLinked { .. } => codes::NO_TEMPLATE,
            Self::TemplateNotFound { .. } => codes::TEMPLATE_NOT_FOUND,
            Self::MissingRequiredField { .. } => codes::INCONSISTENT,
            Self::TransformFailed { .. } => codes::TRANSFORM,
        }
    }

    /// Returns the error class.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownContractType { .. } | Self::NoTemplateLinked { .. } => ErrorClass::NotFound,
            // A linked template that does not resolve means the registry is broken.
            Self::TemplateNotFound { .. } => ErrorClass::Configuration,
            Self::MissingRequiredField { .. } => ErrorClass::Inconsistency,
            Self::TransformFailed { .. } => ErrorClass::Transform,
        }
    }

    /// Converts the error into the caller-facing report.
    #[must_use]
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            class: self.class(),
            message: self.to_string(),
        }
    }
}

/// Errors reported by external collaborators behind the [`ports`](crate::ports).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The requested record does not exist.
    #[error("record not found: {id}")]
    NotFound {
        /// Record id.
        id: String,
    },

    /// The collaborator rejected the request.
    #[error("request rejected: {reason}")]
    Rejected {
        /// Reason.
        reason: String,
    },

    /// The collaborator could not be reached.
    #[error("collaborator unavailable: {reason}")]
    Unavailable {
        /// Reason.
        reason: String,
    },
}

/// The umbrella error type for contractflow operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Registry misconfiguration.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Payload or blueprint compilation failure.
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// Collaborator failure.
    #[error("{0}")]
    Port(#[from] PortError),

    /// A collaborator call exceeded its time budget.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The budget in seconds.
        seconds: f64,
    },

    /// Logging could not be initialized.
    #[error("Observability error: {0}")]
    Observability(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
