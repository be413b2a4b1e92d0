//! Pair similarity scoring for duplicate detection.
//!
//! Uses Jaro-Winkler similarity on normalized name and street, and exact or
//! Jaro-Winkler similarity on phone digits, combined by configured weights.

use rapidfuzz::distance::jaro_winkler;

use intake_model::text::{comparison_key, digits_only};
use intake_model::{NormalizedProvider, ScoreComponent};

use crate::config::SimilarityWeights;

/// Score for a single provider pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    /// Weighted similarity in `[0, 1]`, rounded to four decimals.
    pub score: f64,
    /// Breakdown of score components for explainability.
    pub components: Vec<ScoreComponent>,
}

impl PairScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}: {:.0}%", c.field, c.similarity * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Fields compared for one provider, precomputed once per analysis.
#[derive(Debug, Clone)]
pub struct ComparableFields {
    pub name: String,
    pub street: String,
    pub phone: String,
}

impl ComparableFields {
    pub fn of(provider: &NormalizedProvider) -> Self {
        Self {
            name: comparison_key(&provider.provider_name),
            street: comparison_key(&provider.address.street1),
            phone: digits_only(&provider.contact_info.phone_number),
        }
    }
}

/// Engine for scoring provider pairs.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: SimilarityWeights,
}

impl ScoringEngine {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, left: &ComparableFields, right: &ComparableFields) -> PairScore {
        let name = similarity(&left.name, &right.name);
        let street = similarity(&left.street, &right.street);
        let phone = if !left.phone.is_empty() && left.phone == right.phone {
            1.0
        } else {
            similarity(&left.phone, &right.phone)
        };

        let w = &self.weights;
        let weighted = (name * w.name + street * w.street + phone * w.phone) / w.total();

        PairScore {
            score: round4(weighted),
            components: vec![
                component("provider_name", name, w.name),
                component("address.street1", street, w.street),
                component("contact_info.phone_number", phone, w.phone),
            ],
        }
    }
}

fn component(field: &str, similarity: f64, weight: f64) -> ScoreComponent {
    ScoreComponent {
        field: field.to_string(),
        similarity: round4(similarity),
        weight,
    }
}

fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    jaro_winkler::similarity(a.chars(), b.chars())
}

/// Round to four decimals so reports serialize stably.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, street: &str, phone: &str) -> ComparableFields {
        ComparableFields {
            name: comparison_key(name),
            street: comparison_key(street),
            phone: digits_only(phone),
        }
    }

    #[test]
    fn near_identical_names_score_high() {
        let engine = ScoringEngine::new(SimilarityWeights::default());
        let a = fields("Greenwood Medical Center", "12 Elm Street", "+14135550100");
        let b = fields("Greenwod Medical Center", "12 Elm Street", "+14135550100");
        let score = engine.score(&a, &b);
        assert!(score.score > 0.95, "{}", score.explain());
        assert_eq!(score.components.len(), 3);
        assert_eq!(score.components[2].similarity, 1.0);
    }

    #[test]
    fn unrelated_providers_score_low() {
        let engine = ScoringEngine::new(SimilarityWeights::default());
        let a = fields("Greenwood Medical Center", "12 Elm Street", "+14135550100");
        let b = fields("Bayside Dental", "9 Shore Road", "+12075550199");
        assert!(engine.score(&a, &b).score < 0.85);
    }

    #[test]
    fn zero_weight_ignores_field() {
        let engine = ScoringEngine::new(SimilarityWeights {
            name: 1.0,
            street: 0.0,
            phone: 0.0,
        });
        let a = fields("Harbor Clinic", "40 Harbor Way", "+12075550142");
        let b = fields("Harbor Clinic", "9 Shore Road", "+44 20 7946 0958");
        assert_eq!(engine.score(&a, &b).score, 1.0);
    }

    #[test]
    fn round4_truncates_noise() {
        assert_eq!(round4(0.123_456_7), 0.1235);
    }
}
