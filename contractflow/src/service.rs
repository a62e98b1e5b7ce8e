//! End-to-end document generation over the collaborator ports.
//!
//! Fetch the record, run the [`Orchestrator`], dispatch the payload and
//! write the outcome back to the record. Only collaborator I/O is subject to
//! timeouts; the engine itself is synchronous.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::errors::{EngineError, PortError};
use crate::orchestrator::{Orchestrator, ProcessOptions, ProcessOutcome};
use crate::ports::{ContractStore, DispatchReceipt, DocumentDispatcher};
use crate::utils::values::Record;

/// Record field holding the generation status.
pub const STATUS_FIELD: &str = "document_status";
/// Record field holding the dispatched payload fingerprint.
pub const FINGERPRINT_FIELD: &str = "document_fingerprint";

/// Generation status written back to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Payload accepted by the rendering service.
    Dispatched,
    /// Record failed validation.
    Rejected,
    /// Record was valid but could not be compiled.
    Failed,
    /// The rendering service refused or could not be reached.
    DispatchFailed,
}

impl DocumentStatus {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
            Self::DispatchFailed => "dispatch_failed",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time budgets for collaborator calls.
#[derive(Debug, Clone)]
pub struct ServiceTimeouts {
    /// Record fetch.
    pub fetch: Duration,
    /// Payload dispatch.
    pub dispatch: Duration,
    /// Status write-back.
    pub patch: Duration,
}

impl Default for ServiceTimeouts {
    fn default() -> Self {
        Self {
            fetch: Duration::from_secs(5),
            dispatch: Duration::from_secs(30),
            patch: Duration::from_secs(5),
        }
    }
}

impl ServiceTimeouts {
    /// Creates the default budgets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses one budget for every call.
    #[must_use]
    pub fn uniform(budget: Duration) -> Self {
        Self {
            fetch: budget,
            dispatch: budget,
            patch: budget,
        }
    }

    /// Sets the fetch budget.
    #[must_use]
    pub fn with_fetch(mut self, budget: Duration) -> Self {
        self.fetch = budget;
        self
    }

    /// Sets the dispatch budget.
    #[must_use]
    pub fn with_dispatch(mut self, budget: Duration) -> Self {
        self.dispatch = budget;
        self
    }

    /// Sets the patch budget.
    #[must_use]
    pub fn with_patch(mut self, budget: Duration) -> Self {
        self.patch = budget;
        self
    }
}

/// Result of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Contract id.
    pub contract_id: String,
    /// Status written to the record.
    pub status: DocumentStatus,
    /// Engine outcome.
    pub outcome: ProcessOutcome,
    /// Dispatch acknowledgement, when dispatched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<DispatchReceipt>,
}

/// Drives one contract from stored record to dispatched payload.
pub struct DocumentGenerationService {
    orchestrator: Orchestrator,
    store: Arc<dyn ContractStore>,
    dispatcher: Arc<dyn DocumentDispatcher>,
    timeouts: ServiceTimeouts,
}

impl fmt::Debug for DocumentGenerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentGenerationService")
            .field("orchestrator", &self.orchestrator)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl DocumentGenerationService {
    /// Creates a service with default timeouts.
    #[must_use]
    pub fn new(
        orchestrator: Orchestrator,
        store: Arc<dyn ContractStore>,
        dispatcher: Arc<dyn DocumentDispatcher>,
    ) -> Self {
        Self {
            orchestrator,
            store,
            dispatcher,
            timeouts: ServiceTimeouts::default(),
        }
    }

    /// Sets the collaborator time budgets.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: ServiceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The orchestrator in use.
    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Generates the document for `contract_id`.
    ///
    /// Validation and compile failures are not errors: they are recorded on
    /// the contract and in the returned report.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Port` or `EngineError::Timeout` when a
    /// collaborator fails. A failed dispatch is still written back to the
    /// record before the dispatch error is returned; a failure of that
    /// write-back is only logged.
    pub async fn generate(
        &self,
        contract_id: &str,
        options: ProcessOptions,
    ) -> Result<GenerationReport, EngineError> {
        let contract = bounded("fetch_record", self.timeouts.fetch, self.store.get(contract_id)).await?;
        let outcome = self
            .orchestrator
            .process(&contract.contract_type, &contract.fields, options);

        let (status, receipt) = match &outcome.payload {
            None if !outcome.validation.is_valid => (DocumentStatus::Rejected, None),
            None => (DocumentStatus::Failed, None),
            Some(payload) => {
                let dispatched = bounded(
                    "dispatch_payload",
                    self.timeouts.dispatch,
                    self.dispatcher.dispatch(payload),
                )
                .await;
                match dispatched {
                    Ok(receipt) => (DocumentStatus::Dispatched, Some(receipt)),
                    Err(err) => {
                        warn!(contract_id = %contract_id, error = %err, "Payload dispatch failed");
                        if let Err(patch_err) = self
                            .patch_status(contract_id, DocumentStatus::DispatchFailed, None)
                            .await
                        {
                            error!(
                                contract_id = %contract_id,
                                error = %patch_err,
                                "Could not record dispatch failure"
                            );
                        }
                        return Err(err);
                    }
                }
            }
        };

        self.patch_status(contract_id, status, receipt.as_ref()).await?;

        info!(
            contract_id = %contract_id,
            contract_type = %contract.contract_type,
            status = %status,
            "Document generation finished"
        );

        Ok(GenerationReport {
            contract_id: contract_id.to_string(),
            status,
            outcome,
            receipt,
        })
    }

    async fn patch_status(
        &self,
        contract_id: &str,
        status: DocumentStatus,
        receipt: Option<&DispatchReceipt>,
    ) -> Result<(), EngineError> {
        let mut patch = Record::new();
        patch.insert(STATUS_FIELD.to_string(), json!(status));
        if let Some(receipt) = receipt {
            patch.insert(
                FINGERPRINT_FIELD.to_string(),
                Value::String(receipt.fingerprint.clone()),
            );
        }
        bounded("patch_record", self.timeouts.patch, self.store.update(contract_id, patch)).await?;
        Ok(())
    }
}

async fn bounded<T, F>(operation: &'static str, budget: Duration, call: F) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, PortError>>,
{
    match timeout(budget, call).await {
        Ok(result) => result.map_err(EngineError::from),
        Err(_) => {
            let budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, budget_ms, "Collaborator call timed out");
            Err(EngineError::Timeout {
                operation: operation.to_string(),
                seconds: budget.as_secs_f64(),
            })
        }
    }
}
