//! File-backed provider store.
//!
//! A single JSON document holds the accepted providers, their reference
//! tables, retired ids and the validation failure log. The store doubles as
//! the [`ProviderIndex`] snapshot used by validation and normalization.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use intake_model::{
    KnownProviders, NormalizedProvider, ProviderFingerprint, ProviderId, ProviderIndex,
    ProviderType, ReferenceTables, ValidationFailure,
};

/// Store file schema version.
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store file version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Primary-key violation: the id already belongs to another provider.
    #[error("provider id {provider_id} is already used by a different provider")]
    DuplicateKey { provider_id: ProviderId },

    #[error("provider id {provider_id} was deleted and cannot be reused")]
    RetiredId { provider_id: ProviderId },

    #[error("provider {provider_id} not found")]
    NotFound { provider_id: ProviderId },
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    version: u32,
    providers: BTreeMap<ProviderId, NormalizedProvider>,
    references: ReferenceTables,
    retired: BTreeSet<ProviderId>,
    failures: Vec<ValidationFailure>,
}

/// Whether an upsert created or replaced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Search criteria; every set field must match.
#[derive(Debug, Clone, Default)]
pub struct ProviderQuery {
    /// Case-insensitive substring of the provider name.
    pub name: Option<String>,
    pub provider_type: Option<ProviderType>,
    /// Case-insensitive state code.
    pub state: Option<String>,
    /// Case-insensitive city.
    pub city: Option<String>,
}

impl ProviderQuery {
    pub fn matches(&self, provider: &NormalizedProvider) -> bool {
        let name_ok = self.name.as_ref().is_none_or(|needle| {
            provider
                .provider_name
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });
        let type_ok = self
            .provider_type
            .is_none_or(|t| provider.provider_type == t);
        let state_ok = self
            .state
            .as_ref()
            .is_none_or(|s| provider.address.state.eq_ignore_ascii_case(s.trim()));
        let city_ok = self
            .city
            .as_ref()
            .is_none_or(|c| provider.address.city.eq_ignore_ascii_case(c.trim()));
        name_ok && type_ok && state_ok && city_ok
    }
}

#[derive(Debug, Clone)]
pub struct ProviderStore {
    path: PathBuf,
    data: StoreData,
}

impl ProviderStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "store file not found, starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                data: StoreData {
                    version: STORE_VERSION,
                    ..StoreData::default()
                },
            });
        }

        let bytes = fs::read(path).map_err(|e| StoreError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        })?;
        let data: StoreData = serde_json::from_slice(&bytes).map_err(|e| StoreError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        if data.version != STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: data.version,
                expected: STORE_VERSION,
            });
        }
        debug!(
            path = %path.display(),
            providers = data.providers.len(),
            retired = data.retired.len(),
            "opened store"
        );
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store atomically (temp file + rename).
    pub fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.data).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Io {
            operation: "replace",
            path: self.path.clone(),
            source: e,
        })?;

        info!(path = %self.path.display(), providers = self.len(), "saved store");
        Ok(())
    }

    /// Insert or replace a provider and merge its reference rows.
    ///
    /// Replacing is only allowed for the same provider (same fingerprint);
    /// retired ids are refused.
    pub fn upsert(
        &mut self,
        provider: &NormalizedProvider,
        references: &ReferenceTables,
    ) -> Result<Upsert> {
        let id = &provider.provider_id;
        if self.data.retired.contains(id) {
            return Err(StoreError::RetiredId {
                provider_id: id.clone(),
            });
        }
        let outcome = match self.data.providers.get(id) {
            Some(existing) if existing.fingerprint() != provider.fingerprint() => {
                return Err(StoreError::DuplicateKey {
                    provider_id: id.clone(),
                });
            }
            Some(_) => Upsert::Updated,
            None => Upsert::Inserted,
        };
        self.data.references.merge(references);
        self.data.providers.insert(id.clone(), provider.clone());
        Ok(outcome)
    }

    pub fn get(&self, id: &ProviderId) -> Option<&NormalizedProvider> {
        self.data.providers.get(id)
    }

    /// Providers in id order.
    pub fn providers(&self) -> impl Iterator<Item = &NormalizedProvider> {
        self.data.providers.values()
    }

    pub fn search(&self, query: &ProviderQuery) -> Vec<&NormalizedProvider> {
        self.providers().filter(|p| query.matches(p)).collect()
    }

    /// Remove a provider and retire its id for good.
    pub fn delete(&mut self, id: &ProviderId) -> Result<NormalizedProvider> {
        let removed = self
            .data
            .providers
            .remove(id)
            .ok_or_else(|| StoreError::NotFound {
                provider_id: id.clone(),
            })?;
        self.data.retired.insert(id.clone());
        info!(provider_id = %id, "provider deleted, id retired");
        Ok(removed)
    }

    pub fn references(&self) -> &ReferenceTables {
        &self.data.references
    }

    pub fn record_failures<I>(&mut self, failures: I)
    where
        I: IntoIterator<Item = ValidationFailure>,
    {
        self.data.failures.extend(failures);
    }

    /// Recorded failures, newest first.
    pub fn failures(&self, limit: Option<usize>) -> Vec<&ValidationFailure> {
        let mut failures: Vec<&ValidationFailure> = self.data.failures.iter().collect();
        failures.reverse();
        failures.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        failures.truncate(limit.unwrap_or(usize::MAX));
        failures
    }

    /// Point-in-time snapshot for a run.
    pub fn known_providers(&self) -> KnownProviders {
        KnownProviders::from_providers(self.providers())
            .with_retired(self.data.retired.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.data.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.providers.is_empty()
    }
}

impl ProviderIndex for ProviderStore {
    fn fingerprint(&self, id: &ProviderId) -> Option<ProviderFingerprint> {
        self.data.providers.get(id).map(NormalizedProvider::fingerprint)
    }

    fn is_retired(&self, id: &ProviderId) -> bool {
        self.data.retired.contains(id)
    }
}
