//! Lab sample and batch (lote) models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a transition is attempted on a sample that already
/// left the available state.
#[derive(Error, Debug, PartialEq)]
#[error("sample {code} is not available ({status})")]
pub struct SampleNotAvailable {
    pub code: String,
    pub status: String,
}

/// Lab sample status.
///
/// The checkbox "selected" state on the inclusion dialog is transient screen
/// state and is never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SampleStatus {
    /// Collected, not yet assigned to a batch
    Available,
    /// Included in a transport/processing batch
    Batched { batch_id: String },
    /// Terminal; the reason is kept for the audit trail
    Cancelled { reason: String },
}

impl SampleStatus {
    /// Short label used in listings and errors.
    pub fn label(&self) -> &'static str {
        match self {
            SampleStatus::Available => "available",
            SampleStatus::Batched { .. } => "batched",
            SampleStatus::Cancelled { .. } => "cancelled",
        }
    }
}

/// A biological sample tracked from collection through batching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabSample {
    /// Unique sample ID
    pub id: String,
    /// Display code (e.g. "AM-00042")
    pub code: String,
    /// Patient name
    pub patient: String,
    /// Material type (e.g. "Sangue", "Urina")
    pub material: String,
    /// Sector/bench that processes the material
    pub bench: String,
    /// Collection timestamp
    pub collected_at: String,
    /// Lifecycle status
    pub status: SampleStatus,
    /// Last update timestamp
    pub updated_at: String,
}

impl LabSample {
    /// Register a freshly collected sample.
    pub fn new(code: String, patient: String, material: String, bench: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            patient,
            material,
            bench,
            collected_at: now.clone(),
            status: SampleStatus::Available,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, SampleStatus::Available)
    }

    /// Move the sample into a batch. Only available samples qualify.
    pub fn assign_to_batch(&mut self, batch_id: &str) -> Result<(), SampleNotAvailable> {
        if !self.is_available() {
            return Err(self.not_available());
        }
        self.status = SampleStatus::Batched {
            batch_id: batch_id.to_string(),
        };
        self.touch();
        Ok(())
    }

    /// Cancel the sample. Terminal; a cancelled sample never becomes
    /// available or batched again.
    pub fn cancel(&mut self, reason: &str) -> Result<(), SampleNotAvailable> {
        if !self.is_available() {
            return Err(self.not_available());
        }
        self.status = SampleStatus::Cancelled {
            reason: reason.to_string(),
        };
        self.touch();
        Ok(())
    }

    fn not_available(&self) -> SampleNotAvailable {
        SampleNotAvailable {
            code: self.code.clone(),
            status: self.status.label().to_string(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// A batch (lote) grouping samples for transport/processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleBatch {
    /// Unique batch ID
    pub id: String,
    /// Display code (e.g. "LT-0007")
    pub code: String,
    /// Member sample IDs
    pub sample_ids: Vec<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl SampleBatch {
    /// Create an empty batch; members are added as samples transition in.
    pub fn new(code: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            sample_ids: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
