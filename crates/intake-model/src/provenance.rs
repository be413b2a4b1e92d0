#![deny(unsafe_code)]

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SourceRef {
    /// Input file path (or other stable identifier) for the record.
    pub source: String,
    /// Record number within the parsed input (1-based, excluding header).
    pub record: u64,
}

impl SourceRef {
    pub fn new(source: impl Into<String>, record: u64) -> Self {
        Self {
            source: source.into(),
            record,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.record)
    }
}
