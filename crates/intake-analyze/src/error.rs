use thiserror::Error;

use intake_model::{ProviderId, ReferenceId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A provider points at a reference row the tables do not hold.
    #[error("provider {provider_id} references missing reference row {reference_id}")]
    MissingReference {
        provider_id: ProviderId,
        reference_id: ReferenceId,
    },

    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),
}
