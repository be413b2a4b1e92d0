//! Normalized provider records.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ProviderType, ServiceCategory};
use crate::ids::{ProviderId, ReferenceId, ReferenceKind};
use crate::text::{address_key, comparison_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    pub street1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    /// Uppercased state or region code.
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl NormalizedAddress {
    pub fn comparison_key(&self) -> String {
        address_key(&self.street1, &self.city, &self.state, &self.zip_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContact {
    /// E.164 formatted phone number.
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedAccreditation {
    pub organization: String,
    pub license_number: String,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
    /// Expired relative to the normalization `as_of` date. Flagged, never rejected.
    pub expired: bool,
}

/// The validated, canonical form of a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProvider {
    pub provider_id: ProviderId,
    /// True when the id was derived by the normalizer rather than supplied.
    pub id_generated: bool,
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub address: NormalizedAddress,
    pub contact_info: NormalizedContact,
    pub services: BTreeSet<ServiceCategory>,
    pub accreditations: Vec<NormalizedAccreditation>,
    pub specialties: BTreeSet<ReferenceId>,
    pub languages: BTreeSet<ReferenceId>,
    pub insurance_accepted: BTreeSet<ReferenceId>,
    /// Volatile: excluded from idempotency comparisons.
    pub normalized_at: DateTime<Utc>,
}

impl NormalizedProvider {
    /// Reference ids attached to this provider, grouped by kind.
    pub fn references(&self) -> impl Iterator<Item = (ReferenceKind, &ReferenceId)> {
        self.specialties
            .iter()
            .map(|id| (ReferenceKind::Specialty, id))
            .chain(self.languages.iter().map(|id| (ReferenceKind::Language, id)))
            .chain(
                self.insurance_accepted
                    .iter()
                    .map(|id| (ReferenceKind::Insurance, id)),
            )
    }

    pub fn reference_ids(&self, kind: ReferenceKind) -> &BTreeSet<ReferenceId> {
        match kind {
            ReferenceKind::Specialty => &self.specialties,
            ReferenceKind::Language => &self.languages,
            ReferenceKind::Insurance => &self.insurance_accepted,
        }
    }

    pub fn fingerprint(&self) -> ProviderFingerprint {
        ProviderFingerprint {
            name_key: comparison_key(&self.provider_name),
            address_key: self.address.comparison_key(),
        }
    }

    pub fn core_fields(&self) -> CoreFields {
        CoreFields {
            name_key: comparison_key(&self.provider_name),
            provider_type: self.provider_type,
            address_key: self.address.comparison_key(),
            phone_number: self.contact_info.phone_number.clone(),
        }
    }

    pub fn expired_accreditations(&self) -> usize {
        self.accreditations.iter().filter(|a| a.expired).count()
    }

    /// Copy with the volatile timestamp zeroed, for idempotency comparisons.
    pub fn without_volatile(&self) -> Self {
        Self {
            normalized_at: DateTime::<Utc>::UNIX_EPOCH,
            ..self.clone()
        }
    }
}

/// Identity of a provider for contradiction checks: name plus address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderFingerprint {
    pub name_key: String,
    pub address_key: String,
}

impl ProviderFingerprint {
    /// Fields that differ materially between two fingerprints.
    pub fn differing_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name_key != other.name_key {
            fields.push("provider_name");
        }
        if self.address_key != other.address_key {
            fields.push("address");
        }
        fields
    }
}

/// Core identifying fields compared across ingestions of the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoreFields {
    pub name_key: String,
    pub provider_type: ProviderType,
    pub address_key: String,
    pub phone_number: String,
}

impl CoreFields {
    pub fn differing_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name_key != other.name_key {
            fields.push("provider_name");
        }
        if self.provider_type != other.provider_type {
            fields.push("provider_type");
        }
        if self.address_key != other.address_key {
            fields.push("address");
        }
        if self.phone_number != other.phone_number {
            fields.push("contact_info.phone_number");
        }
        fields
    }
}
