#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::ModelError;

/// Opaque provider identifier.
///
/// Either supplied by the source document or derived by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub const GENERATED_PREFIX: &'static str = "prv-";

    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > 64 || trimmed.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidProviderId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derive a generated id from a stable seed.
    ///
    /// `salt` is bumped by the caller until the id does not collide with a
    /// retired or foreign id.
    pub fn derive(seed: &str, salt: u32) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(b"provider\0");
        hasher.update(seed.as_bytes());
        if salt > 0 {
            hasher.update([0u8]);
            hasher.update(salt.to_string().as_bytes());
        }
        let digest: [u8; 32] = hasher.finalize().into();
        Self(format!("{}{}", Self::GENERATED_PREFIX, hex::encode(&digest[..8])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

/// Which reference table a free-text value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Specialty,
    Language,
    Insurance,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Specialty,
        ReferenceKind::Language,
        ReferenceKind::Insurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Specialty => "specialty",
            ReferenceKind::Language => "language",
            ReferenceKind::Insurance => "insurance",
        }
    }

    /// Prefix used for ids in this table.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ReferenceKind::Specialty => "spc",
            ReferenceKind::Language => "lng",
            ReferenceKind::Insurance => "ins",
        }
    }

    /// Name of the reference table in the relational layout.
    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceKind::Specialty => "specialties",
            ReferenceKind::Language => "languages",
            ReferenceKind::Insurance => "insurance_plans",
        }
    }

    /// Name of the provider link table in the relational layout.
    pub fn link_table_name(&self) -> &'static str {
        match self {
            ReferenceKind::Specialty => "provider_specialties",
            ReferenceKind::Language => "provider_languages",
            ReferenceKind::Insurance => "provider_insurance",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a canonical reference row (specialty, language, insurance).
///
/// Derived from the kind and the canonical key, so the same string from any
/// document always lands on the same row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn derive(kind: ReferenceKind, canonical_key: &str) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(kind.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(canonical_key.as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        Self(format!("{}-{}", kind.id_prefix(), hex::encode(&digest[..8])))
    }

    /// Reference kind encoded in the id prefix.
    pub fn kind(&self) -> Option<ReferenceKind> {
        let (prefix, _) = self.0.split_once('-')?;
        ReferenceKind::ALL
            .into_iter()
            .find(|kind| kind.id_prefix() == prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReferenceId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let id = Self(value);
        match id.kind() {
            Some(_) => Ok(id),
            None => Err(ModelError::InvalidReferenceId(id.0)),
        }
    }
}

impl From<ReferenceId> for String {
    fn from(id: ReferenceId) -> Self {
        id.0
    }
}
