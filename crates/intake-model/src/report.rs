//! Analysis report produced by the duplicate and consistency analyzer.
//!
//! Every collection here is ordered (sorted vectors or `BTreeMap`), so a
//! report serializes identically for an unchanged corpus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::ProviderType;
use crate::ids::ProviderId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Distinct provider ids in the corpus.
    pub provider_count: usize,
    /// Records examined, including repeated ingestions of the same id.
    pub record_count: usize,
    pub exact_duplicates: Vec<ExactDuplicateGroup>,
    pub contradictions: Vec<Contradiction>,
    pub fuzzy_candidates: Vec<DuplicateCandidate>,
    pub trends: TrendSummary,
    pub inconsistencies: Vec<Inconsistency>,
    pub completeness: Completeness,
}

impl AnalysisReport {
    pub fn resubmission_count(&self) -> usize {
        self.exact_duplicates
            .iter()
            .filter(|g| g.kind == ExactDuplicateKind::Resubmission)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExactDuplicateKind {
    /// Same id, same core fields: harmless.
    Resubmission,
    /// Same id, differing core fields.
    Contradiction,
}

/// Records sharing one provider id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactDuplicateGroup {
    pub provider_id: ProviderId,
    pub record_count: usize,
    pub kind: ExactDuplicateKind,
}

/// Same id, disagreeing core fields. Needs a human decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub provider_id: ProviderId,
    pub differing_fields: Vec<String>,
    pub variants: Vec<ContradictionVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContradictionVariant {
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub address: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateSide {
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub state: String,
}

/// Contribution of one field to a similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub field: String,
    pub similarity: f64,
    pub weight: f64,
}

/// Two distinct providers that look like the same entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub left: CandidateSide,
    pub right: CandidateSide,
    /// Weighted similarity in `[0, 1]`, rounded to four decimals.
    pub score: f64,
    pub components: Vec<ScoreComponent>,
    /// Blocking keys under which the pair was compared.
    pub blocking_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub by_provider_type: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
    pub by_service: BTreeMap<String, usize>,
    pub by_language: BTreeMap<String, usize>,
    pub by_insurance: BTreeMap<String, usize>,
    /// Most common specialties, count descending then label ascending.
    pub top_specialties: Vec<LabelCount>,
    pub expired_accreditations: usize,
    pub providers_with_expired_accreditations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InconsistencyKind {
    NamingPatterns,
    HospitalCoreServices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inconsistency {
    pub kind: InconsistencyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,
    pub details: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completeness {
    /// Optional field -> number of providers missing it.
    pub fields_missing: BTreeMap<String, usize>,
    /// Share of optional fields populated, in `[0, 1]`, rounded to four decimals.
    pub score: f64,
}
