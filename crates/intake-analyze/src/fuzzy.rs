//! Fuzzy duplicates: blocking, then pairwise scoring.
//!
//! Providers are bucketed by a cheap blocking key (name prefix plus state,
//! and optionally phone digits) and only pairs sharing a bucket are scored.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use intake_model::text::comparison_key;
use intake_model::{CandidateSide, DuplicateCandidate, NormalizedProvider};

use crate::config::AnalyzerConfig;
use crate::score::{ComparableFields, ScoringEngine};

/// Name-plus-state blocking key, e.g. `gree|MA`.
pub fn name_block_key(provider: &NormalizedProvider, prefix_len: usize) -> Option<String> {
    let key = comparison_key(&provider.provider_name);
    let key = key.strip_prefix("the ").unwrap_or(&key);
    let compact: String = key
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(prefix_len)
        .collect();
    if compact.is_empty() {
        return None;
    }
    Some(format!("{compact}|{}", provider.address.state.to_uppercase()))
}

/// Phone blocking key, e.g. `phone:14135550100`.
pub fn phone_block_key(fields: &ComparableFields) -> Option<String> {
    (!fields.phone.is_empty()).then(|| format!("phone:{}", fields.phone))
}

/// Find candidate pairs among distinct providers.
///
/// `providers` must hold one record per id; output is sorted by score
/// descending, then by ids.
pub fn check(
    providers: &[&NormalizedProvider],
    config: &AnalyzerConfig,
) -> Vec<DuplicateCandidate> {
    let fields: Vec<ComparableFields> =
        providers.iter().map(|p| ComparableFields::of(p)).collect();

    let mut blocks: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, provider) in providers.iter().enumerate() {
        if let Some(key) = name_block_key(provider, config.name_prefix_len) {
            blocks.entry(key).or_default().push(idx);
        }
        if config.phone_blocking
            && let Some(key) = phone_block_key(&fields[idx])
        {
            blocks.entry(key).or_default().push(idx);
        }
    }

    // Pair -> blocking keys it was compared under.
    let mut pairs: BTreeMap<(usize, usize), BTreeSet<String>> = BTreeMap::new();
    for (key, members) in &blocks {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                let pair = if a < b { (a, b) } else { (b, a) };
                pairs.entry(pair).or_default().insert(key.clone());
            }
        }
    }
    debug!(blocks = blocks.len(), pairs = pairs.len(), "fuzzy blocking complete");

    let engine = ScoringEngine::new(config.weights);
    let mut candidates: Vec<DuplicateCandidate> = pairs
        .into_iter()
        .filter_map(|((a, b), keys)| {
            let (left, right) = ordered(providers[a], providers[b]);
            let (lf, rf) = if std::ptr::eq(left, providers[a]) {
                (&fields[a], &fields[b])
            } else {
                (&fields[b], &fields[a])
            };
            let scored = engine.score(lf, rf);
            (scored.score >= config.similarity_threshold).then(|| DuplicateCandidate {
                left: side(left),
                right: side(right),
                score: scored.score,
                components: scored.components,
                blocking_keys: keys.into_iter().collect(),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.left.provider_id.cmp(&b.left.provider_id))
            .then_with(|| a.right.provider_id.cmp(&b.right.provider_id))
    });
    candidates
}

/// Smaller id on the left so a pair always reads the same way.
fn ordered<'a>(
    a: &'a NormalizedProvider,
    b: &'a NormalizedProvider,
) -> (&'a NormalizedProvider, &'a NormalizedProvider) {
    if a.provider_id <= b.provider_id {
        (a, b)
    } else {
        (b, a)
    }
}

fn side(provider: &NormalizedProvider) -> CandidateSide {
    CandidateSide {
        provider_id: provider.provider_id.clone(),
        provider_name: provider.provider_name.clone(),
        state: provider.address.state.clone(),
    }
}
