use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid provider id: {0:?}")]
    InvalidProviderId(String),
    #[error("invalid reference id: {0:?}")]
    InvalidReferenceId(String),
    #[error("unknown provider type: {0}")]
    UnknownProviderType(String),
    #[error("unknown service category: {0}")]
    UnknownServiceCategory(String),
    #[error("provider {provider_id} references missing reference row {reference_id}")]
    MissingReference {
        provider_id: String,
        reference_id: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
