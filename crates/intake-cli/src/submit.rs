//! Batch submission of accepted providers.
//!
//! Submission is a trait so transports can be swapped; the shipped
//! implementations spool batches to disk or accept everything (dry run).
//! Per-record outcomes are reported unchanged and nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use intake_model::{
    BatchOutcome, NormalizedProvider, RecordSubmission, RunStatistics, SubmissionStatus,
};

pub trait BatchSubmitter {
    /// Submit one batch. Failures are reported per record, never raised.
    fn submit(&mut self, batch_index: usize, batch: &[NormalizedProvider]) -> BatchOutcome;
}

/// Accepts every record without sending anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSubmitter;

impl BatchSubmitter for DryRunSubmitter {
    fn submit(&mut self, batch_index: usize, batch: &[NormalizedProvider]) -> BatchOutcome {
        outcome(batch_index, None, batch, &SubmissionStatus::Submitted)
    }
}

/// Writes each batch as `batch-NNNNN.json` into a spool directory for a
/// downstream transport to pick up.
#[derive(Debug, Clone)]
pub struct SpoolSubmitter {
    dir: PathBuf,
}

#[derive(Serialize)]
struct SpoolFile<'a> {
    batch_id: &'a str,
    providers: &'a [NormalizedProvider],
}

impl SpoolSubmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, batch_id: &str, batch: &[NormalizedProvider]) -> Result<PathBuf, String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("create spool directory {}: {e}", self.dir.display()))?;
        let path = self.dir.join(format!("{batch_id}.json"));
        let body = serde_json::to_vec_pretty(&SpoolFile {
            batch_id,
            providers: batch,
        })
        .map_err(|e| format!("serialize batch: {e}"))?;
        fs::write(&path, body).map_err(|e| format!("write {}: {e}", path.display()))?;
        Ok(path)
    }
}

impl BatchSubmitter for SpoolSubmitter {
    fn submit(&mut self, batch_index: usize, batch: &[NormalizedProvider]) -> BatchOutcome {
        let batch_id = format!("batch-{batch_index:05}");
        match self.write(&batch_id, batch) {
            Ok(path) => {
                info!(
                    batch = batch_index,
                    records = batch.len(),
                    path = %path.display(),
                    "batch spooled"
                );
                outcome(batch_index, Some(batch_id), batch, &SubmissionStatus::Submitted)
            }
            Err(reason) => {
                warn!(
                    batch = batch_index,
                    records = batch.len(),
                    %reason,
                    "batch submission failed"
                );
                outcome(
                    batch_index,
                    Some(batch_id),
                    batch,
                    &SubmissionStatus::Failed { reason },
                )
            }
        }
    }
}

fn outcome(
    batch_index: usize,
    batch_id: Option<String>,
    batch: &[NormalizedProvider],
    status: &SubmissionStatus,
) -> BatchOutcome {
    BatchOutcome {
        batch_index,
        batch_id,
        records: batch
            .iter()
            .map(|p| RecordSubmission {
                provider_id: p.provider_id.clone(),
                status: status.clone(),
            })
            .collect(),
    }
}

/// Submit `providers` in order, `batch_size` at a time (1-based batch index).
pub fn submit_in_batches(
    submitter: &mut dyn BatchSubmitter,
    providers: &[NormalizedProvider],
    batch_size: usize,
    statistics: &mut RunStatistics,
) -> Vec<BatchOutcome> {
    providers
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(idx, batch)| {
            let outcome = submitter.submit(idx + 1, batch);
            statistics.record_batch(&outcome);
            outcome
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_submits_nothing() {
        let mut stats = RunStatistics::default();
        let outcomes = submit_in_batches(&mut DryRunSubmitter, &[], 50, &mut stats);
        assert!(outcomes.is_empty());
        assert_eq!(stats.batches, 0);
    }
}
