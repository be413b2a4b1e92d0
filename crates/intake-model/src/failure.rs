use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provenance::SourceRef;

/// Failure taxonomy for validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed, missing, or mistyped field. Rejects.
    Schema,
    /// Semantic violation. Rejects.
    BusinessRule,
    /// Conflicting records for the same identifier. Rejects without overwriting.
    Contradiction,
    /// Recorded, does not reject.
    SoftWarning,
}

impl FailureKind {
    /// Whether this kind rejects the document.
    pub fn is_hard(&self) -> bool {
        !matches!(self, FailureKind::SoftWarning)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Schema => "Schema",
            FailureKind::BusinessRule => "Business rule",
            FailureKind::Contradiction => "Contradiction",
            FailureKind::SoftWarning => "Warning",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which validation stage produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    Schema,
    BusinessRules,
}

/// Provider id when the document supplied a usable one, else its input index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureSubject {
    ProviderId(String),
    Index(usize),
}

impl fmt::Display for FailureSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureSubject::ProviderId(id) => f.write_str(id),
            FailureSubject::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// A single recorded validation finding. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    #[serde(rename = "provider_id_or_index")]
    pub subject: FailureSubject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    pub stage: ValidationStage,
    /// Dotted field path, e.g. `address.zip_code` or `accreditations[1].issue_date`.
    pub field: String,
    /// Stable rule identifier, e.g. `required` or `date-order`.
    pub rule: String,
    pub kind: FailureKind,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

impl ValidationFailure {
    pub fn is_hard(&self) -> bool {
        self.kind.is_hard()
    }
}
