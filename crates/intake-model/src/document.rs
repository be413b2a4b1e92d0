//! Schema-accepted provider document.
//!
//! This is the typed form the schema validator hands to the business rules.
//! Values are trimmed and enum fields are parsed, but nothing is canonicalized
//! yet; that is the normalizer's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{ProviderType, ServiceCategory};
use crate::ids::ProviderId;
use crate::provider::ProviderFingerprint;
use crate::text::{address_key, comparison_key};

pub const DEFAULT_COUNTRY: &str = "USA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    pub fn comparison_key(&self) -> String {
        address_key(&self.street1, &self.city, &self.state, &self.zip_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A license or certification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccreditationRecord {
    pub organization: String,
    pub license_number: String,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub address: Address,
    pub contact_info: ContactInfo,
    /// Services in input order; may still contain repeats.
    pub services: Vec<ServiceCategory>,
    pub accreditations: Vec<AccreditationRecord>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub insurance_accepted: Vec<String>,
}

impl ProviderDocument {
    /// Label used in logs and failure records when no id was supplied.
    pub fn display_name(&self) -> &str {
        &self.provider_name
    }

    /// Name and address identity, comparable with a stored provider's.
    pub fn fingerprint(&self) -> ProviderFingerprint {
        ProviderFingerprint {
            name_key: comparison_key(&self.provider_name),
            address_key: self.address.comparison_key(),
        }
    }
}
