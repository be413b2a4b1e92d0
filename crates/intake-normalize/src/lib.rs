//! Provider normalization.
//!
//! Maps a validated [`ProviderDocument`](intake_model::ProviderDocument) into
//! a [`NormalizedProvider`](intake_model::NormalizedProvider) and the
//! relational rows storage persists:
//!
//! - assigns or propagates the provider id ([`assign_provider_id`])
//! - canonicalizes text, phone numbers and reference collections
//! - flags expired accreditations relative to the injected `as_of` date
//!
//! Normalization is idempotent: the same document and snapshot always give the
//! same output apart from `normalized_at`.

mod error;
mod identity;
mod normalizer;
mod types;

pub use error::NormalizationError;
pub use identity::{MAX_ID_ATTEMPTS, assign_provider_id};
pub use normalizer::normalize;
pub use types::{NormalizationContext, NormalizationOutput};
