use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, info_span};

use intake_analyze::Analyzer;
use intake_cli::config::IntakeConfig;
use intake_cli::pipeline::{PipelineOptions, run_pipeline};
use intake_cli::store::{ProviderQuery, ProviderStore};
use intake_cli::submit::{BatchSubmitter, DryRunSubmitter, SpoolSubmitter};
use intake_ingest::load_path;
use intake_model::{AnalysisReport, NormalizedProvider, ProviderId};
use intake_validate::ServiceMatching;

use crate::cli::{AnalyzeArgs, FailuresArgs, ProvidersCommand, RunArgs, SearchArgs};
use crate::summary::{
    print_analysis_summary, print_failure_table, print_provider_detail, print_provider_table,
};
use crate::types::RunSummary;

pub fn run_intake(args: &RunArgs, mut config: IntakeConfig) -> Result<RunSummary> {
    if let Some(size) = args.batch_size {
        config.batch_size = size;
    }
    if let Some(threshold) = args.similarity_threshold {
        config.analysis.similarity_threshold = threshold;
    }
    if args.lenient_services {
        config.service_matching = ServiceMatching::Lenient;
    }
    config.validate()?;

    let now = Utc::now();
    let as_of = args.as_of.unwrap_or_else(|| now.date_naive());
    let options =
        PipelineOptions::from_config(&config, as_of).with_include_stored(args.include_stored);

    // =========================================================================
    // Stage 0: Load input and store
    // =========================================================================
    let load_start = Instant::now();
    let documents = info_span!("load", input = %args.input.display())
        .in_scope(|| load_path(&args.input))
        .with_context(|| format!("load input {}", args.input.display()))?;
    let mut store = ProviderStore::open(&args.store.store)
        .with_context(|| format!("open store {}", args.store.store.display()))?;
    info!(
        documents = documents.len(),
        stored = store.len(),
        as_of = %as_of,
        duration_ms = load_start.elapsed().as_millis() as u64,
        "load complete"
    );

    let (mut submitter, spool_dir): (Box<dyn BatchSubmitter>, _) = if args.dry_run {
        (Box::new(DryRunSubmitter), None)
    } else {
        (
            Box::new(SpoolSubmitter::new(&args.spool_dir)),
            Some(args.spool_dir.clone()),
        )
    };

    let outcome = run_pipeline(&documents, &mut store, submitter.as_mut(), &options, now)?;

    // =========================================================================
    // Stage 4: Persist and report
    // =========================================================================
    if !args.dry_run {
        store.save().context("save store")?;
    }
    write_json(&args.failures_output, &outcome.failures).context("write failures")?;
    write_json(&args.analysis_output, &outcome.report).context("write analysis report")?;

    Ok(RunSummary {
        outcome,
        store: args.store.store.clone(),
        failures_output: args.failures_output.clone(),
        analysis_output: args.analysis_output.clone(),
        spool_dir,
    })
}

pub fn run_analyze(args: &AnalyzeArgs, mut config: IntakeConfig) -> Result<AnalysisReport> {
    if let Some(threshold) = args.similarity_threshold {
        config.analysis.similarity_threshold = threshold;
    }
    config.validate()?;

    let store = ProviderStore::open(&args.store.store)
        .with_context(|| format!("open store {}", args.store.store.display()))?;
    let providers: Vec<NormalizedProvider> = store.providers().cloned().collect();
    let report = info_span!("analyze", providers = providers.len()).in_scope(|| {
        Analyzer::new(config.analysis)
            .analyze(&providers, store.references())
            .context("analysis failed")
    })?;
    write_json(&args.analysis_output, &report).context("write analysis report")?;

    println!("Analysis report: {}", args.analysis_output.display());
    print_analysis_summary(&report);
    Ok(report)
}

pub fn run_providers(command: &ProvidersCommand) -> Result<()> {
    match command {
        ProvidersCommand::List(store) => {
            let store = open_store(&store.store)?;
            let providers: Vec<_> = store.providers().collect();
            println!("Providers in store ({}):", providers.len());
            print_provider_table(&providers);
        }
        ProvidersCommand::Show { provider_id, store } => {
            let store = open_store(&store.store)?;
            let id = parse_id(provider_id)?;
            let provider = store
                .get(&id)
                .ok_or_else(|| anyhow!("provider not found: {id}"))?;
            print_provider_detail(provider, store.references());
        }
        ProvidersCommand::Search(args) => run_search(args)?,
        ProvidersCommand::Delete { provider_id, store } => {
            let mut store = open_store(&store.store)?;
            let id = parse_id(provider_id)?;
            let removed = store.delete(&id)?;
            store.save().context("save store")?;
            println!(
                "Deleted {} ({}); id {} is retired",
                removed.provider_name, removed.provider_type, removed.provider_id
            );
        }
    }
    Ok(())
}

fn run_search(args: &SearchArgs) -> Result<()> {
    let store = open_store(&args.store.store)?;
    let query = ProviderQuery {
        name: args.name.clone(),
        provider_type: args.provider_type,
        state: args.state.clone(),
        city: args.city.clone(),
    };
    let found = store.search(&query);
    println!("Found {} matching providers:", found.len());
    print_provider_table(&found);
    Ok(())
}

pub fn run_failures(args: &FailuresArgs) -> Result<()> {
    let store = open_store(&args.store.store)?;
    let failures = store.failures(Some(args.limit));
    println!("Recent validation failures ({}):", failures.len());
    print_failure_table(&failures);
    Ok(())
}

fn open_store(path: &Path) -> Result<ProviderStore> {
    ProviderStore::open(path).with_context(|| format!("open store {}", path.display()))
}

fn parse_id(raw: &str) -> Result<ProviderId> {
    ProviderId::new(raw).with_context(|| format!("invalid provider id {raw:?}"))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_json_creates_parent_and_writes_complete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("failures.json");
        let values: Vec<u32> = (0..2_000).collect();

        write_json(&path, &values).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        let parsed: Vec<u32> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, values);
    }
}
