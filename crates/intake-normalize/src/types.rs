use chrono::{DateTime, NaiveDate, Utc};

use intake_model::{NormalizedProvider, ProviderIndex, ReferenceTables, RelationalRows};

/// Inputs that are not part of the document.
///
/// Time is injected so normalization stays a pure function of its inputs.
pub struct NormalizationContext<'a, I: ?Sized> {
    /// Reference date for accreditation expiry flags.
    pub as_of: NaiveDate,
    /// Volatile stamp written to `normalized_at`.
    pub normalized_at: DateTime<Utc>,
    /// Snapshot of known and retired provider ids.
    pub index: &'a I,
}

impl<'a, I: ProviderIndex + ?Sized> NormalizationContext<'a, I> {
    pub fn new(index: &'a I, as_of: NaiveDate, normalized_at: DateTime<Utc>) -> Self {
        Self {
            as_of,
            normalized_at,
            index,
        }
    }
}

/// A normalized provider plus everything storage needs to persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationOutput {
    pub provider: NormalizedProvider,
    /// Reference rows this provider introduced (first spelling within the document).
    pub references: ReferenceTables,
    pub rows: RelationalRows,
}
