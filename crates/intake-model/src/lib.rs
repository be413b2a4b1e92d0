//! Provider intake data model definitions.

pub mod document;
pub mod enums;
pub mod error;
pub mod failure;
pub mod ids;
pub mod index;
pub mod processing;
pub mod provenance;
pub mod provider;
pub mod reference;
pub mod report;
pub mod rows;
pub mod text;

pub use document::{AccreditationRecord, Address, ContactInfo, DEFAULT_COUNTRY, ProviderDocument};
pub use enums::{ProviderType, ServiceCategory, enum_token};
pub use error::{ModelError, Result};
pub use failure::{FailureKind, FailureSubject, ValidationFailure, ValidationStage};
pub use ids::{ProviderId, ReferenceId, ReferenceKind};
pub use index::{KnownProviders, ProviderIndex};
pub use processing::{BatchOutcome, RecordSubmission, RunStatistics, SubmissionStatus};
pub use provenance::SourceRef;
pub use provider::{
    CoreFields, NormalizedAccreditation, NormalizedAddress, NormalizedContact, NormalizedProvider,
    ProviderFingerprint,
};
pub use reference::{ReferenceRow, ReferenceTables};
pub use report::{
    AnalysisReport, CandidateSide, Completeness, Contradiction, ContradictionVariant,
    DuplicateCandidate, ExactDuplicateGroup, ExactDuplicateKind, Inconsistency,
    InconsistencyKind, LabelCount, ScoreComponent, TrendSummary,
};
pub use rows::{
    AccreditationRow, AddressRow, ContactRow, ProviderReferenceRow, ProviderRow,
    ProviderServiceRow, RelationalRows,
};
