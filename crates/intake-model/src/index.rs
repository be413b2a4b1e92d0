//! Read-only snapshot of already-known provider ids.
//!
//! Validation and normalization consult the snapshot instead of global
//! state, so callers can shard documents across workers as long as each
//! worker reads the same snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::ProviderId;
use crate::provider::{NormalizedProvider, ProviderFingerprint};

pub trait ProviderIndex {
    /// Fingerprint of the active provider with this id, if any.
    fn fingerprint(&self, id: &ProviderId) -> Option<ProviderFingerprint>;

    /// Whether the id belonged to a provider that was deleted.
    fn is_retired(&self, id: &ProviderId) -> bool;

    /// Whether the id is taken in any way.
    fn is_taken(&self, id: &ProviderId) -> bool {
        self.is_retired(id) || self.fingerprint(id).is_some()
    }
}

impl<T: ProviderIndex + ?Sized> ProviderIndex for &T {
    fn fingerprint(&self, id: &ProviderId) -> Option<ProviderFingerprint> {
        (**self).fingerprint(id)
    }

    fn is_retired(&self, id: &ProviderId) -> bool {
        (**self).is_retired(id)
    }
}

/// In-memory snapshot built from stored providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownProviders {
    active: BTreeMap<ProviderId, ProviderFingerprint>,
    retired: BTreeSet<ProviderId>,
}

impl KnownProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_providers<'a, I>(providers: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedProvider>,
    {
        let mut known = Self::new();
        for provider in providers {
            known.insert(provider);
        }
        known
    }

    pub fn insert(&mut self, provider: &NormalizedProvider) {
        self.active
            .insert(provider.provider_id.clone(), provider.fingerprint());
    }

    pub fn retire(&mut self, id: &ProviderId) {
        self.active.remove(id);
        self.retired.insert(id.clone());
    }

    pub fn with_retired<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ProviderId>,
    {
        for id in ids {
            self.retire(&id);
        }
        self
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }
}

impl ProviderIndex for KnownProviders {
    fn fingerprint(&self, id: &ProviderId) -> Option<ProviderFingerprint> {
        self.active.get(id).cloned()
    }

    fn is_retired(&self, id: &ProviderId) -> bool {
        self.retired.contains(id)
    }
}
