//! CLI argument definitions for provider intake.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use intake_cli::logging::LogFormat;
use intake_model::ProviderType;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "provider-intake",
    version,
    about = "Provider intake - validate, normalize and analyze medical provider data",
    long_about = "Validate, normalize and analyze medical provider onboarding data.\n\n\
                  Reads JSON, JSON Lines and CSV files, rejects documents that fail\n\
                  schema or business rules, stores accepted providers, submits them\n\
                  in batches and reports duplicates, trends and inconsistencies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow phone numbers and email addresses in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML configuration file (CLI flags take precedence).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate, normalize, store, submit and analyze an input file or folder.
    Run(RunArgs),

    /// Analyze the stored provider corpus.
    Analyze(AnalyzeArgs),

    /// Inspect or modify stored providers.
    Providers {
        #[command(subcommand)]
        command: ProvidersCommand,
    },

    /// List recorded validation failures, newest first.
    Failures(FailuresArgs),
}

#[derive(Args, Clone)]
pub struct StoreArgs {
    /// Provider store file.
    #[arg(long = "store", value_name = "PATH", default_value = "data/providers.json")]
    pub store: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input file (.json, .jsonl, .ndjson, .csv) or a folder of them.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Providers per submission batch.
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,

    /// Where to write validation failures.
    #[arg(
        long = "failures-output",
        value_name = "PATH",
        default_value = "validation_failures.json"
    )]
    pub failures_output: PathBuf,

    /// Where to write the analysis report.
    #[arg(
        long = "analysis-output",
        value_name = "PATH",
        default_value = "data_analysis_report.json"
    )]
    pub analysis_output: PathBuf,

    /// Directory that receives spooled submission batches.
    #[arg(long = "spool-dir", value_name = "DIR", default_value = "spool")]
    pub spool_dir: PathBuf,

    /// Validate and report without persisting the store or spooling batches.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Minimum similarity for fuzzy duplicate candidates (0-1).
    #[arg(long = "similarity-threshold", value_name = "SCORE")]
    pub similarity_threshold: Option<f64>,

    /// Drop unknown service categories with a warning instead of rejecting.
    #[arg(long = "lenient-services")]
    pub lenient_services: bool,

    /// Reference date for accreditation expiry (default: today, UTC).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// Analyze stored providers together with this run's records.
    #[arg(long = "include-stored")]
    pub include_stored: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Where to write the analysis report.
    #[arg(
        long = "analysis-output",
        value_name = "PATH",
        default_value = "data_analysis_report.json"
    )]
    pub analysis_output: PathBuf,

    /// Minimum similarity for fuzzy duplicate candidates (0-1).
    #[arg(long = "similarity-threshold", value_name = "SCORE")]
    pub similarity_threshold: Option<f64>,
}

#[derive(Subcommand)]
pub enum ProvidersCommand {
    /// List all stored providers.
    List(StoreArgs),

    /// Show one provider in detail.
    Show {
        #[arg(value_name = "PROVIDER_ID")]
        provider_id: String,
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Search providers by name, type, state or city.
    Search(SearchArgs),

    /// Delete a provider. Its id is retired and never reused.
    Delete {
        #[arg(value_name = "PROVIDER_ID")]
        provider_id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Case-insensitive name substring.
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Provider type (e.g. hospital, urgent_care).
    #[arg(long = "type", value_name = "TYPE")]
    pub provider_type: Option<ProviderType>,

    /// State code.
    #[arg(long = "state")]
    pub state: Option<String>,

    /// City.
    #[arg(long = "city")]
    pub city: Option<String>,
}

#[derive(Args)]
pub struct FailuresArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Maximum number of failures to list.
    #[arg(long = "limit", value_name = "N", default_value_t = 10)]
    pub limit: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
