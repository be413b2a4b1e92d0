//! Entry point: load every document under a path.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use intake_model::SourceRef;

use crate::csv_input::read_csv;
use crate::error::{IngestError, Result};
use crate::format::{InputFormat, list_input_files};
use crate::json_input::{read_json, read_json_lines};

/// One raw document with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub source: SourceRef,
    pub value: Value,
}

/// Load documents from a single file, picking the reader by extension.
pub fn load_documents(path: &Path) -> Result<Vec<LoadedDocument>> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = InputFormat::from_path(path)?;
    let documents = match format {
        InputFormat::Json => read_json(path)?,
        InputFormat::JsonLines => read_json_lines(path)?,
        InputFormat::Csv => read_csv(path)?,
    };
    info!(
        path = %path.display(),
        format = %format,
        documents = documents.len(),
        "loaded input"
    );
    Ok(documents)
}

/// Load a file, or every supported file in a directory in file-name order.
pub fn load_path(path: &Path) -> Result<Vec<LoadedDocument>> {
    if !path.is_dir() {
        return load_documents(path);
    }
    let files = list_input_files(path)?;
    debug!(dir = %path.display(), files = files.len(), "discovered input files");

    let mut documents = Vec::new();
    for file in &files {
        documents.extend(load_documents(file)?);
    }
    Ok(documents)
}
