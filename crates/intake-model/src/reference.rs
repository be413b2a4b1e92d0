use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{ReferenceId, ReferenceKind};
use crate::text::{canonical_key, collapse_whitespace};

/// One canonical row in a reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub id: ReferenceId,
    pub kind: ReferenceKind,
    /// Case-folded comparison key.
    pub key: String,
    /// Original casing of the first spelling seen.
    pub display: String,
}

impl ReferenceRow {
    pub fn from_raw(kind: ReferenceKind, raw: &str) -> Option<Self> {
        let display = collapse_whitespace(raw);
        if display.is_empty() {
            return None;
        }
        let key = canonical_key(&display);
        Some(Self {
            id: ReferenceId::derive(kind, &key),
            kind,
            key,
            display,
        })
    }
}

/// Specialty, language and insurance reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    rows: BTreeMap<ReferenceId, ReferenceRow>,
}

impl ReferenceTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, keeping the existing display spelling on conflict.
    ///
    /// Returns the id of the canonical row.
    pub fn insert(&mut self, row: ReferenceRow) -> ReferenceId {
        let id = row.id.clone();
        self.rows.entry(id.clone()).or_insert(row);
        id
    }

    pub fn merge(&mut self, other: &ReferenceTables) {
        for row in other.rows.values() {
            self.insert(row.clone());
        }
    }

    pub fn get(&self, id: &ReferenceId) -> Option<&ReferenceRow> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &ReferenceId) -> bool {
        self.rows.contains_key(id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &ReferenceRow> {
        self.rows.values()
    }

    pub fn rows_of_kind(&self, kind: ReferenceKind) -> impl Iterator<Item = &ReferenceRow> {
        self.rows.values().filter(move |row| row.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display label for an id, falling back to the id itself.
    pub fn label(&self, id: &ReferenceId) -> String {
        self.rows
            .get(id)
            .map(|row| row.display.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
