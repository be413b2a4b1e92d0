//! Error types for normalization.

use thiserror::Error;

use intake_model::ModelError;
use intake_validate::PhoneError;

/// Errors raised when a document cannot be normalized.
///
/// Documents that passed validation should not produce these; they signal a
/// caller that skipped a validation stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("{field}: {source}")]
    Phone {
        field: &'static str,
        #[source]
        source: PhoneError,
    },

    #[error("no free provider id for seed after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },

    #[error(transparent)]
    Model(#[from] ModelError),
}
