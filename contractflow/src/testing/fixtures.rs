//! Record fixtures.

use serde_json::Value;

use crate::registry::catalog::ids;
use crate::utils::values::Record;

/// Builds contract records field by field.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Starts from an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a complete, valid employment record for the built-in
    /// Omani employment types.
    #[must_use]
    pub fn employment() -> Self {
        Self::new()
            .with("first_party_id", "employer-001")
            .with("second_party_id", "promoter-042")
            .with("job_title", "Site Engineer")
            .with("contract_start_date", "2024-01-01")
            .with("basic_salary", 450)
            .with("currency", "OMR")
            .with("work_location", "Muscat")
    }

    /// [`RecordBuilder::employment`] plus a one-year end date.
    #[must_use]
    pub fn fixed_term() -> Self {
        Self::employment().with("contract_end_date", "2024-12-31")
    }

    /// [`RecordBuilder::employment`] plus 20 weekly hours.
    #[must_use]
    pub fn part_time() -> Self {
        Self::employment().with("working_hours_per_week", 20)
    }

    /// A complete internship record.
    #[must_use]
    pub fn internship() -> Self {
        Self::new()
            .with("first_party_id", "host-001")
            .with("second_party_id", "intern-009")
            .with("contract_start_date", "2024-06-01")
            .with("contract_end_date", "2024-09-01")
            .with("training_program", "Civil engineering")
            .with("supervisor_name", "Maryam Al-Harthy")
    }

    /// A complete consulting record.
    #[must_use]
    pub fn consulting() -> Self {
        Self::new()
            .with("first_party_id", "client-007")
            .with("second_party_id", "consultant-003")
            .with("scope_of_work", "ERP rollout")
            .with("contract_start_date", "2024-03-01")
            .with("contract_end_date", "2025-03-01")
            .with("professional_fee", 1500.25)
            .with("currency", "OMR")
    }

    /// A complete executive record.
    #[must_use]
    pub fn executive() -> Self {
        Self::employment()
            .with("job_title", "Chief Operating Officer")
            .with("basic_salary", 4200)
            .with("reporting_to", "Board of Directors")
    }

    /// A complete record for a built-in contract type, if one is defined.
    #[must_use]
    pub fn for_type(type_id: &str) -> Option<Self> {
        match type_id {
            ids::OMAN_UNLIMITED | ids::REMOTE_WORK => Some(Self::employment()),
            ids::OMAN_FIXED_TERM => Some(Self::fixed_term()),
            ids::OMAN_PART_TIME => Some(Self::part_time()),
            ids::OMAN_INTERNSHIP => Some(Self::internship()),
            ids::CONSULTING => Some(Self::consulting()),
            ids::EXECUTIVE => Some(Self::executive()),
            _ => None,
        }
    }

    /// Sets a field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.insert(field.into(), value.into());
        self
    }

    /// Removes a field.
    #[must_use]
    pub fn without(mut self, field: &str) -> Self {
        self.record.remove(field);
        self
    }

    /// Returns the record.
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl From<RecordBuilder> for Record {
    fn from(builder: RecordBuilder) -> Self {
        builder.build()
    }
}
