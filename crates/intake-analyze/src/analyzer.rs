//! Analysis entry point.

use std::time::Instant;

use tracing::{debug, info};

use intake_model::{AnalysisReport, NormalizedProvider, ReferenceTables};

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::{completeness, exact, fuzzy, inconsistencies, trends};

/// Duplicate, trend and consistency analyzer over a normalized corpus.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze `providers` against `tables`.
    ///
    /// Records may repeat an id (re-ingestions). Statistics count each id once,
    /// using a deterministic representative record. The only failures are an
    /// invalid configuration and a dangling reference id.
    pub fn analyze(
        &self,
        providers: &[NormalizedProvider],
        tables: &ReferenceTables,
    ) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();
        self.config.validate()?;
        check_references(providers, tables)?;

        // 1. Exact duplicates by id
        let groups = exact::group_by_id(providers);
        let (exact_duplicates, contradictions) = exact::check(&groups);

        let distinct: Vec<&NormalizedProvider> = groups
            .values()
            .filter_map(|records| exact::representative(records))
            .collect();
        debug!(
            records = providers.len(),
            distinct = distinct.len(),
            groups = exact_duplicates.len(),
            "exact duplicate pass complete"
        );

        // 2. Fuzzy duplicates across distinct ids
        let fuzzy_candidates = fuzzy::check(&distinct, &self.config);

        // 3. Trends
        let trends = trends::summarize(&distinct, tables, self.config.top_specialties);

        // 4. Inconsistencies
        let inconsistencies = inconsistencies::check(&distinct, &self.config);

        // 5. Completeness
        let completeness = completeness::measure(&distinct);

        info!(
            providers = distinct.len(),
            exact_groups = exact_duplicates.len(),
            contradictions = contradictions.len(),
            fuzzy_candidates = fuzzy_candidates.len(),
            inconsistencies = inconsistencies.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(AnalysisReport {
            provider_count: distinct.len(),
            record_count: providers.len(),
            exact_duplicates,
            contradictions,
            fuzzy_candidates,
            trends,
            inconsistencies,
            completeness,
        })
    }
}

/// Every reference id a provider holds must resolve in the tables.
fn check_references(
    providers: &[NormalizedProvider],
    tables: &ReferenceTables,
) -> Result<(), AnalysisError> {
    for provider in providers {
        if let Some((_, id)) = provider.references().find(|(_, id)| !tables.contains(id)) {
            return Err(AnalysisError::MissingReference {
                provider_id: provider.provider_id.clone(),
                reference_id: id.clone(),
            });
        }
    }
    Ok(())
}
