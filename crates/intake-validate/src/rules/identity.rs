//! Provider id contradiction pre-check.

use intake_model::{ProviderDocument, ProviderIndex};

use crate::issue::Issue;

/// A supplied id must be free, or held by the same provider.
pub fn check<I: ProviderIndex + ?Sized>(document: &ProviderDocument, index: &I) -> Vec<Issue> {
    let Some(id) = &document.provider_id else {
        return Vec::new();
    };

    if index.is_retired(id) {
        return vec![Issue::IdRetired {
            field: "provider_id".to_string(),
            provider_id: id.to_string(),
        }];
    }

    let Some(existing) = index.fingerprint(id) else {
        return Vec::new();
    };
    let differing = existing.differing_fields(&document.fingerprint());
    if differing.is_empty() {
        return Vec::new();
    }
    vec![Issue::IdContradiction {
        field: "provider_id".to_string(),
        provider_id: id.to_string(),
        differing_fields: differing.into_iter().map(str::to_string).collect(),
    }]
}
