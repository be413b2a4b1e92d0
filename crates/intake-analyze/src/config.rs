//! Analyzer configuration.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Field weights for the pair similarity score. Normalized by their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    pub name: f64,
    pub street: f64,
    pub phone: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            name: 0.5,
            street: 0.3,
            phone: 0.2,
        }
    }
}

impl SimilarityWeights {
    pub fn total(&self) -> f64 {
        self.name + self.street + self.phone
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Minimum weighted similarity for a duplicate candidate.
    pub similarity_threshold: f64,
    /// Characters of the normalized name used in the blocking key.
    pub name_prefix_len: usize,
    /// Also block on identical phone digits.
    pub phone_blocking: bool,
    pub weights: SimilarityWeights,
    /// Number of specialties kept in the trend summary.
    pub top_specialties: usize,
    /// Provider types with at least this many providers are checked for naming drift.
    pub naming_min_group: usize,
    /// More distinct name patterns than this is an inconsistency.
    pub naming_max_patterns: usize,
    /// Hospital core-service check runs at this many hospitals or more.
    pub hospital_min_group: usize,
    /// Fewer services shared by all hospitals than this is an inconsistency.
    pub hospital_min_common_services: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            name_prefix_len: 4,
            phone_blocking: true,
            weights: SimilarityWeights::default(),
            top_specialties: 10,
            naming_min_group: 6,
            naming_max_patterns: 2,
            hospital_min_group: 4,
            hospital_min_common_services: 2,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_name_prefix_len(mut self, len: usize) -> Self {
        self.name_prefix_len = len;
        self
    }

    pub fn with_phone_blocking(mut self, enabled: bool) -> Self {
        self.phone_blocking = enabled;
        self
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_top_specialties(mut self, count: usize) -> Self {
        self.top_specialties = count;
        self
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(AnalysisError::InvalidConfig(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.name_prefix_len == 0 {
            return Err(AnalysisError::InvalidConfig(
                "name_prefix_len must be at least 1".to_string(),
            ));
        }
        let w = &self.weights;
        if [w.name, w.street, w.phone].iter().any(|v| *v < 0.0) || w.total() <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "similarity weights must be non-negative with a positive sum".to_string(),
            ));
        }
        Ok(())
    }
}
