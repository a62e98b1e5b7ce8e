//! In-memory collaborators for tests and local runs.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::compile::WebhookPayload;
use crate::errors::PortError;
use crate::ports::{ContractStore, DispatchReceipt, DocumentDispatcher, RecordFilter, StoredContract};
use crate::utils::values::Record;

/// A [`ContractStore`] backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryContractStore {
    contracts: Mutex<BTreeMap<String, StoredContract>>,
}

impl InMemoryContractStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a contract under a caller-chosen id.
    pub fn insert(&self, id: impl Into<String>, contract_type: impl Into<String>, fields: Record) {
        let contract = StoredContract::new(id, contract_type, fields);
        self.contracts.lock().insert(contract.id.clone(), contract);
    }

    /// Returns a copy of a contract without going through the async port.
    #[must_use]
    pub fn snapshot(&self, id: &str) -> Option<StoredContract> {
        self.contracts.lock().get(id).cloned()
    }

    /// Number of stored contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.lock().len()
    }

    /// True if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.lock().is_empty()
    }
}

#[async_trait]
impl ContractStore for InMemoryContractStore {
    async fn get(&self, id: &str) -> Result<StoredContract, PortError> {
        self.snapshot(id).ok_or_else(|| PortError::NotFound { id: id.to_string() })
    }

    async fn create(&self, contract_type: &str, fields: Record) -> Result<StoredContract, PortError> {
        let contract = StoredContract::new(Uuid::new_v4().to_string(), contract_type, fields);
        self.contracts
            .lock()
            .insert(contract.id.clone(), contract.clone());
        Ok(contract)
    }

    async fn update(&self, id: &str, patch: Record) -> Result<StoredContract, PortError> {
        let mut contracts = self.contracts.lock();
        let contract = contracts
            .get_mut(id)
            .ok_or_else(|| PortError::NotFound { id: id.to_string() })?;
        contract.fields.extend(patch);
        Ok(contract.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), PortError> {
        self.contracts
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound { id: id.to_string() })
    }

    async fn find(&self, filter: &RecordFilter) -> Result<Vec<StoredContract>, PortError> {
        Ok(self
            .contracts
            .lock()
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }
}

/// A [`DocumentDispatcher`] that records every payload it receives.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    dispatched: Mutex<Vec<WebhookPayload>>,
    reject_with: Mutex<Option<String>>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent dispatches fail with `reason`.
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.reject_with.lock() = Some(reason.into());
    }

    /// Payloads received so far.
    #[must_use]
    pub fn dispatched(&self) -> Vec<WebhookPayload> {
        self.dispatched.lock().clone()
    }

    /// Number of payloads received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.dispatched.lock().len()
    }
}

#[async_trait]
impl DocumentDispatcher for RecordingDispatcher {
    async fn dispatch(&self, payload: &WebhookPayload) -> Result<DispatchReceipt, PortError> {
        if let Some(reason) = self.reject_with.lock().clone() {
            return Err(PortError::Rejected { reason });
        }
        self.dispatched.lock().push(payload.clone());
        Ok(DispatchReceipt {
            dispatch_id: Uuid::new_v4().to_string(),
            fingerprint: payload.fingerprint(),
            accepted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_store_crud() {
        let store = InMemoryContractStore::new();
        let created = store
            .create("consulting-agreement", fields(json!({"currency": "OMR"})))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        let updated = store
            .update(&created.id, fields(json!({"document_status": "dispatched"})))
            .await
            .unwrap();
        assert_eq!(updated.fields["currency"], json!("OMR"));
        assert_eq!(updated.fields["document_status"], json!("dispatched"));

        store.delete(&created.id).await.unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.get(&created.id).await,
            Err(PortError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_store_find_by_filter() {
        let store = InMemoryContractStore::new();
        store.insert("a", "oman-unlimited-makecom", fields(json!({"department": "HR"})));
        store.insert("b", "oman-unlimited-makecom", fields(json!({"department": "IT"})));
        store.insert("c", "consulting-agreement", Record::new());

        let found = store
            .find(
                &RecordFilter::new()
                    .with_contract_type("oman-unlimited-makecom")
                    .with_field("department", json!("IT")),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_dispatcher_records_and_rejects() {
        let dispatcher = RecordingDispatcher::new();
        let payload = WebhookPayload {
            contract_type: "t".to_string(),
            template_id: "ext".to_string(),
            output_format: crate::registry::OutputFormat::Pdf,
            variables: BTreeMap::new(),
            storage_hint: None,
        };

        let receipt = dispatcher.dispatch(&payload).await.unwrap();
        assert_eq!(receipt.fingerprint, payload.fingerprint());
        assert_eq!(dispatcher.call_count(), 1);

        dispatcher.reject_with("quota exceeded");
        let err = dispatcher.dispatch(&payload).await.unwrap_err();
        assert_eq!(err.to_string(), "request rejected: quota exceeded");
        assert_eq!(dispatcher.call_count(), 1);
    }
}
