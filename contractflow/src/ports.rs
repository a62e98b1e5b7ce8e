//! Interfaces to external collaborators.
//!
//! The engine never persists records or renders documents itself. A host
//! application supplies these ports and
//! [`DocumentGenerationService`](crate::service::DocumentGenerationService)
//! drives them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::compile::WebhookPayload;
use crate::errors::PortError;
use crate::utils::values::Record;

/// A contract record as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredContract {
    /// Store-assigned id.
    pub id: String,
    /// Contract type id.
    pub contract_type: String,
    /// Field values.
    pub fields: Record,
}

impl StoredContract {
    /// Creates a stored contract.
    #[must_use]
    pub fn new(id: impl Into<String>, contract_type: impl Into<String>, fields: Record) -> Self {
        Self {
            id: id.into(),
            contract_type: contract_type.into(),
            fields,
        }
    }
}

/// Selection criteria for [`ContractStore::find`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Only contracts of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    /// Only contracts whose fields equal these values.
    #[serde(default)]
    pub field_equals: BTreeMap<String, Value>,
}

impl RecordFilter {
    /// Matches every contract.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one contract type.
    #[must_use]
    pub fn with_contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.contract_type = Some(contract_type.into());
        self
    }

    /// Requires a field to equal `value`.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.field_equals.insert(field.into(), value);
        self
    }

    /// True if `contract` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, contract: &StoredContract) -> bool {
        self.contract_type
            .as_ref()
            .map_or(true, |t| *t == contract.contract_type)
            && self
                .field_equals
                .iter()
                .all(|(field, value)| contract.fields.get(field) == Some(value))
    }
}

/// Acknowledgement returned by the document-rendering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Id assigned by the receiving service.
    pub dispatch_id: String,
    /// Fingerprint of the dispatched payload.
    pub fingerprint: String,
    /// When the payload was accepted.
    pub accepted_at: DateTime<Utc>,
}

/// Record persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Loads a contract by id.
    async fn get(&self, id: &str) -> Result<StoredContract, PortError>;

    /// Creates a contract and returns it with its assigned id.
    async fn create(&self, contract_type: &str, fields: Record) -> Result<StoredContract, PortError>;

    /// Merges `patch` into a contract's fields.
    async fn update(&self, id: &str, patch: Record) -> Result<StoredContract, PortError>;

    /// Deletes a contract.
    async fn delete(&self, id: &str) -> Result<(), PortError>;

    /// Returns contracts matching `filter`, ordered by id.
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<StoredContract>, PortError>;
}

/// Hands webhook payloads to the document-rendering service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentDispatcher: Send + Sync {
    /// Sends one payload.
    async fn dispatch(&self, payload: &WebhookPayload) -> Result<DispatchReceipt, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contract() -> StoredContract {
        StoredContract::new(
            "c-1",
            "oman-unlimited-makecom",
            json!({"currency": "OMR", "department": "HR"})
                .as_object()
                .cloned()
                .unwrap(),
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(RecordFilter::new().matches(&contract()));
    }

    #[test]
    fn test_filter_criteria_combine() {
        let filter = RecordFilter::new()
            .with_contract_type("oman-unlimited-makecom")
            .with_field("currency", json!("OMR"));
        assert!(filter.matches(&contract()));

        let wrong_type = filter.clone().with_contract_type("consulting-agreement");
        assert!(!wrong_type.matches(&contract()));

        let wrong_field = filter.with_field("department", json!("Finance"));
        assert!(!wrong_field.matches(&contract()));
    }
}
