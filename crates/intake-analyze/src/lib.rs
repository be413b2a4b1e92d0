//! Duplicate and consistency analysis over normalized providers.
//!
//! [`Analyzer::analyze`] takes the full corpus and produces an
//! [`AnalysisReport`](intake_model::AnalysisReport):
//!
//! - exact duplicates: records sharing a provider id, split into harmless
//!   re-submissions and contradictions
//! - fuzzy duplicates: blocking on name prefix plus state (and phone digits),
//!   then weighted Jaro-Winkler scoring; candidates are never merged
//! - trend counts, naming and hospital-service inconsistencies, completeness
//!
//! The report is built from ordered collections only, so an unchanged corpus
//! serializes to identical JSON.

mod analyzer;
mod completeness;
mod config;
mod error;
mod exact;
mod fuzzy;
mod inconsistencies;
mod score;
mod trends;

pub use analyzer::Analyzer;
pub use config::{AnalyzerConfig, SimilarityWeights};
pub use error::AnalysisError;
pub use fuzzy::name_block_key;
pub use inconsistencies::name_pattern;
pub use score::{ComparableFields, PairScore, ScoringEngine, round4};
