//! CSV reader: one provider per row, nested fields flattened into columns.
//!
//! Column names map onto document paths:
//!
//! - `address.street1` or `address_street1` (same for `contact_info`)
//! - `accreditations.0.organization`, `accreditations_0_organization` or
//!   `accreditations[0].organization`
//! - `services`, `specialties`, `languages`, `insurance_accepted` hold lists
//!   separated by `;` or `|`
//!
//! Empty cells are left out of the document so the validator sees them as
//! missing rather than blank.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use intake_model::SourceRef;

use crate::error::{IngestError, Result};
use crate::loader::LoadedDocument;

const NESTED_SECTIONS: &[&str] = &["address", "contact_info"];
const LIST_FIELDS: &[&str] = &["services", "specialties", "languages", "insurance_accepted"];
const ACCREDITATIONS: &str = "accreditations";

/// Where a CSV column lands in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Column {
    Top(String),
    List(String),
    Nested(&'static str, String),
    Accreditation(usize, String),
}

impl Column {
    pub(crate) fn classify(header: &str) -> Self {
        let header = header.trim();
        if let Some((idx, field)) = accreditation_column(header) {
            return Self::Accreditation(idx, field.to_string());
        }
        for section in NESTED_SECTIONS {
            if let Some(field) = section_field(header, section) {
                return Self::Nested(section, field.to_string());
            }
        }
        if LIST_FIELDS.contains(&header) {
            return Self::List(header.to_string());
        }
        Self::Top(header.to_string())
    }
}

/// `address.city` / `address_city` -> `city`.
fn section_field<'a>(header: &'a str, section: &str) -> Option<&'a str> {
    let rest = header.strip_prefix(section)?;
    let field = rest.strip_prefix('.').or_else(|| rest.strip_prefix('_'))?;
    (!field.is_empty()).then_some(field)
}

/// `accreditations.0.organization` and friends -> `(0, "organization")`.
fn accreditation_column(header: &str) -> Option<(usize, &str)> {
    let rest = header.strip_prefix(ACCREDITATIONS)?;
    let rest = rest.strip_prefix(['.', '_', '['])?;
    let digits = rest.find(|c: char| !c.is_ascii_digit())?;
    let (idx, field) = rest.split_at(digits);
    let idx = idx.parse().ok()?;
    let field = field.strip_prefix(']').unwrap_or(field);
    let field = field.strip_prefix(['.', '_'])?;
    (!field.is_empty()).then_some((idx, field))
}

/// Read a `.csv` file with a header row.
pub fn read_csv(path: &Path) -> Result<Vec<LoadedDocument>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| IngestError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let columns: Vec<Column> = reader
        .headers()
        .map_err(|e| IngestError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(Column::classify)
        .collect();
    let has_accreditations = columns
        .iter()
        .any(|c| matches!(c, Column::Accreditation(..)));

    let source = path.display().to_string();
    let mut documents = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| IngestError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        documents.push(LoadedDocument {
            source: SourceRef::new(source.clone(), idx as u64 + 1),
            value: row_to_document(&columns, &record, has_accreditations),
        });
    }
    Ok(documents)
}

pub(crate) fn row_to_document(
    columns: &[Column],
    record: &csv::StringRecord,
    has_accreditations: bool,
) -> Value {
    let mut doc = Map::new();
    let mut accreditations: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();

    for (column, cell) in columns.iter().zip(record.iter()) {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        match column {
            Column::Top(key) => {
                doc.insert(key.clone(), Value::String(cell.to_string()));
            }
            Column::List(key) => {
                doc.insert(key.clone(), split_list(cell));
            }
            Column::Nested(section, field) => {
                let entry = doc
                    .entry(*section)
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(nested) = entry {
                    nested.insert(field.clone(), Value::String(cell.to_string()));
                }
            }
            Column::Accreditation(idx, field) => {
                accreditations
                    .entry(*idx)
                    .or_default()
                    .insert(field.clone(), Value::String(cell.to_string()));
            }
        }
    }

    // Rows without any accreditation cells still get an empty list when the
    // file has accreditation columns at all.
    if has_accreditations {
        doc.insert(
            ACCREDITATIONS.to_string(),
            Value::Array(accreditations.into_values().map(Value::Object).collect()),
        );
    }
    Value::Object(doc)
}

fn split_list(cell: &str) -> Value {
    Value::Array(
        cell.split([';', '|'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    )
}
