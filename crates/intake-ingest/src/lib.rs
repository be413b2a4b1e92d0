//! Provider document ingestion.
//!
//! Reads raw provider documents from files and hands them on as untyped JSON
//! values; typing and validation happen downstream.
//!
//! # Formats
//!
//! - **JSON**: one object, or an array of objects
//! - **JSON Lines**: `.jsonl` / `.ndjson`, one object per line
//! - **CSV**: header row, nested fields as dotted or underscored columns
//!
//! Every document carries a [`SourceRef`](intake_model::SourceRef) with its
//! file and 1-based record number.

mod csv_input;
mod error;
mod format;
mod json_input;
mod loader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use csv_input::read_csv;
pub use json_input::{read_json, read_json_lines};
pub use loader::{LoadedDocument, load_documents, load_path};

// === Discovery ===
pub use format::{InputFormat, list_input_files};
