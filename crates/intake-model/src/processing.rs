use serde::{Deserialize, Serialize};

use crate::ids::ProviderId;

/// Per-record result reported back by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSubmission {
    pub provider_id: ProviderId,
    #[serde(flatten)]
    pub status: SubmissionStatus,
}

/// Outcome of one submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// 1-based batch number within the run.
    pub batch_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub records: Vec<RecordSubmission>,
}

impl BatchOutcome {
    pub fn submitted(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == SubmissionStatus::Submitted)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.submitted()
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_documents: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Rejected because of an identifier contradiction (subset of `rejected`).
    pub contradicted: usize,
    /// Accepted or rejected documents that carried at least one soft warning.
    pub soft_warned: usize,
    pub submitted: usize,
    pub submission_failed: usize,
    pub batches: usize,
}

impl RunStatistics {
    pub fn record_batch(&mut self, outcome: &BatchOutcome) {
        self.batches += 1;
        self.submitted += outcome.submitted();
        self.submission_failed += outcome.failed();
    }
}
