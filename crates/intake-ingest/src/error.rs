//! Error types for document ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading provider documents.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input path does not exist.
    #[error("input not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension not recognized as an input format.
    #[error("unsupported input format: {path} (expected .json, .jsonl, .ndjson or .csv)")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// JSON document could not be parsed.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// One line of a JSON Lines file could not be parsed.
    #[error("failed to parse JSON {path} line {line}: {source}")]
    JsonLineParse {
        path: PathBuf,
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level JSON is neither an object nor an array.
    #[error("unexpected JSON shape in {path}: {reason}")]
    UnexpectedShape { path: PathBuf, reason: String },

    /// Failed to read or parse CSV.
    #[error("failed to read CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_file() {
        let err = IngestError::UnsupportedFormat {
            path: PathBuf::from("providers.xlsx"),
        };
        assert!(err.to_string().starts_with("unsupported input format: providers.xlsx"));
    }

    #[test]
    fn json_line_is_reported() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = IngestError::JsonLineParse {
            path: PathBuf::from("batch.jsonl"),
            line: 4,
            source,
        };
        assert!(err.to_string().starts_with("failed to parse JSON batch.jsonl line 4:"));
    }
}
