use std::path::PathBuf;

use intake_cli::pipeline::RunOutcome;

#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub store: PathBuf,
    pub failures_output: PathBuf,
    pub analysis_output: PathBuf,
    /// Spool directory, unset for dry runs.
    pub spool_dir: Option<PathBuf>,
}
