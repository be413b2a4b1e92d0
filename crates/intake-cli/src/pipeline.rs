//! Intake pipeline: validate, normalize, store, submit, analyze.
//!
//! Each document is handled on its own; a rejected or contradicted document
//! is recorded and the run moves on. Only an analysis invariant failure
//! aborts the run.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, info_span, trace, warn};

use intake_analyze::{Analyzer, AnalyzerConfig};
use intake_ingest::LoadedDocument;
use intake_model::{
    AnalysisReport, BatchOutcome, FailureKind, FailureSubject, KnownProviders, NormalizedProvider,
    ProviderDocument, ReferenceTables, RunStatistics, ValidationFailure, ValidationStage,
};
use intake_normalize::{NormalizationContext, NormalizationError, normalize};
use intake_validate::{DocumentContext, RuleOptions, SchemaOptions, Validator};

use crate::config::IntakeConfig;
use crate::logging::redact_value;
use crate::store::{ProviderStore, StoreError};
use crate::submit::{BatchSubmitter, submit_in_batches};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub schema: SchemaOptions,
    pub rules: RuleOptions,
    pub analyzer: AnalyzerConfig,
    pub batch_size: usize,
    /// Analyze stored providers together with this run's records.
    pub include_stored: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &IntakeConfig, as_of: NaiveDate) -> Self {
        Self {
            schema: config.schema_options(),
            rules: config.rule_options(as_of),
            analyzer: config.analysis.clone(),
            batch_size: config.batch_size,
            include_stored: false,
        }
    }

    pub fn with_include_stored(mut self, include: bool) -> Self {
        self.include_stored = include;
        self
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub statistics: RunStatistics,
    pub failures: Vec<ValidationFailure>,
    /// Accepted providers in input order; an id may repeat on re-submission.
    pub accepted: Vec<NormalizedProvider>,
    pub references: ReferenceTables,
    pub batches: Vec<BatchOutcome>,
    pub report: AnalysisReport,
}

/// Result of the validate/normalize/store stage.
#[derive(Debug, Default)]
pub struct IntakeResult {
    pub statistics: RunStatistics,
    pub failures: Vec<ValidationFailure>,
    pub accepted: Vec<NormalizedProvider>,
    pub references: ReferenceTables,
}

pub fn run_pipeline(
    documents: &[LoadedDocument],
    store: &mut ProviderStore,
    submitter: &mut dyn BatchSubmitter,
    options: &PipelineOptions,
    now: DateTime<Utc>,
) -> Result<RunOutcome> {
    let run_span = info_span!("run", documents = documents.len());
    let _run_guard = run_span.enter();

    let prior: Vec<NormalizedProvider> = if options.include_stored {
        store.providers().cloned().collect()
    } else {
        Vec::new()
    };

    // =========================================================================
    // Stage 1: Validate, normalize, store
    // =========================================================================
    let intake_start = Instant::now();
    let IntakeResult {
        mut statistics,
        failures,
        accepted,
        references,
    } = info_span!("intake").in_scope(|| intake(documents, store, options, now));
    store.record_failures(failures.iter().cloned());
    info!(
        accepted = statistics.accepted,
        rejected = statistics.rejected,
        contradicted = statistics.contradicted,
        soft_warned = statistics.soft_warned,
        duration_ms = intake_start.elapsed().as_millis() as u64,
        "intake complete"
    );

    // =========================================================================
    // Stage 2: Submit in batches
    // =========================================================================
    let submit_start = Instant::now();
    let batches = info_span!("submit").in_scope(|| {
        submit_in_batches(submitter, &accepted, options.batch_size, &mut statistics)
    });
    info!(
        batches = statistics.batches,
        submitted = statistics.submitted,
        failed = statistics.submission_failed,
        duration_ms = submit_start.elapsed().as_millis() as u64,
        "submission complete"
    );

    // =========================================================================
    // Stage 3: Analyze
    // =========================================================================
    let report = info_span!("analyze").in_scope(|| {
        let (corpus, tables) = if options.include_stored {
            let mut corpus = prior;
            corpus.extend(accepted.iter().cloned());
            (corpus, store.references().clone())
        } else {
            (accepted.clone(), references.clone())
        };
        Analyzer::new(options.analyzer.clone())
            .analyze(&corpus, &tables)
            .context("analysis failed")
    })?;

    Ok(RunOutcome {
        statistics,
        failures,
        accepted,
        references,
        batches,
        report,
    })
}

/// Validate and normalize every document, upserting accepted providers.
///
/// The validator's snapshot grows as providers are accepted, so a later
/// document that reuses an earlier one's id is checked against it.
pub fn intake(
    documents: &[LoadedDocument],
    store: &mut ProviderStore,
    options: &PipelineOptions,
    now: DateTime<Utc>,
) -> IntakeResult {
    let mut validator: Validator<KnownProviders> = Validator::new(store.known_providers())
        .with_schema_options(options.schema.clone())
        .with_rule_options(options.rules.clone());
    let mut result = IntakeResult::default();

    for (position, loaded) in documents.iter().enumerate() {
        result.statistics.total_documents += 1;
        let ctx = DocumentContext::new(position, now).with_source(loaded.source.clone());
        let verdict = validator.validate(&loaded.value, &ctx);

        if verdict.has_soft_warnings() {
            result.statistics.soft_warned += 1;
        }
        let contradicted = verdict.is_contradiction();
        result.failures.extend(verdict.failures);
        let Some(document) = verdict.document else {
            result.statistics.rejected += 1;
            if contradicted {
                result.statistics.contradicted += 1;
            }
            continue;
        };

        let norm_ctx = NormalizationContext::new(validator.index(), options.rules.as_of, now);
        let output = match normalize(&document, &norm_ctx) {
            Ok(output) => output,
            Err(error) => {
                warn!(subject = %verdict.subject, %error, "normalization failed");
                result.failures.push(normalization_failure(
                    verdict.subject.clone(),
                    &document,
                    &error,
                    &ctx,
                ));
                result.statistics.rejected += 1;
                continue;
            }
        };
        let provider = output.provider;

        if let Err(error) = store.upsert(&provider, &output.references) {
            warn!(provider_id = %provider.provider_id, %error, "store refused provider");
            result.failures.push(store_failure(&provider, &error, &ctx));
            result.statistics.rejected += 1;
            result.statistics.contradicted += 1;
            continue;
        }

        trace!(
            provider_id = %provider.provider_id,
            phone = redact_value(&provider.contact_info.phone_number),
            email = provider.contact_info.email.as_deref().map(redact_value),
            "provider accepted"
        );
        debug!(
            provider_id = %provider.provider_id,
            generated = provider.id_generated,
            source = %loaded.source,
            "provider accepted"
        );
        validator.index_mut().insert(&provider);
        result.references.merge(&output.references);
        result.accepted.push(provider);
        result.statistics.accepted += 1;
    }

    result
}

/// Failure recorded for a validated document the normalizer still refused.
fn normalization_failure(
    subject: FailureSubject,
    document: &ProviderDocument,
    error: &NormalizationError,
    ctx: &DocumentContext,
) -> ValidationFailure {
    ValidationFailure {
        subject,
        provider_name: Some(document.provider_name.clone()),
        stage: ValidationStage::BusinessRules,
        field: "provider".to_string(),
        rule: "normalization".to_string(),
        kind: FailureKind::BusinessRule,
        message: error.to_string(),
        recorded_at: ctx.recorded_at,
        source: ctx.source.clone(),
    }
}

/// Failure recorded when the store's primary-key check refuses a provider.
fn store_failure(
    provider: &NormalizedProvider,
    error: &StoreError,
    ctx: &DocumentContext,
) -> ValidationFailure {
    let rule = match error {
        StoreError::RetiredId { .. } => "id-retired",
        _ => "id-contradiction",
    };
    ValidationFailure {
        subject: FailureSubject::ProviderId(provider.provider_id.to_string()),
        provider_name: Some(provider.provider_name.clone()),
        stage: ValidationStage::BusinessRules,
        field: "provider_id".to_string(),
        rule: rule.to_string(),
        kind: FailureKind::Contradiction,
        message: error.to_string(),
        recorded_at: ctx.recorded_at,
        source: ctx.source.clone(),
    }
}
