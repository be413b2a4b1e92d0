//! JSON and JSON Lines readers.

use std::path::Path;

use serde_json::Value;

use intake_model::SourceRef;

use crate::error::{IngestError, Result};
use crate::loader::LoadedDocument;

/// Read a `.json` file holding one object or an array of them.
///
/// Array elements are passed through as-is, so a non-object element still
/// reaches validation and is rejected there with its position.
pub fn read_json(path: &Path) -> Result<Vec<LoadedDocument>> {
    let text = read_text(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| IngestError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source = path.display().to_string();
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(idx, value)| LoadedDocument {
                source: SourceRef::new(source.clone(), idx as u64 + 1),
                value,
            })
            .collect()),
        Value::Object(_) => Ok(vec![LoadedDocument {
            source: SourceRef::new(source, 1),
            value,
        }]),
        other => Err(IngestError::UnexpectedShape {
            path: path.to_path_buf(),
            reason: format!("expected an object or array, found {}", kind_of(&other)),
        }),
    }
}

/// Read a JSON Lines file. Blank lines are skipped; the record number is the
/// 1-based line number.
pub fn read_json_lines(path: &Path) -> Result<Vec<LoadedDocument>> {
    let text = read_text(path)?;
    let source = path.display().to_string();

    let mut documents = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx as u64 + 1;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(line).map_err(|e| IngestError::JsonLineParse {
            path: path.to_path_buf(),
            line: line_no,
            source: e,
        })?;
        documents.push(LoadedDocument {
            source: SourceRef::new(source.clone(), line_no),
            value,
        });
    }
    Ok(documents)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
