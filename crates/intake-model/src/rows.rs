//! Relational row shapes handed to the storage collaborator.
//!
//! One provider maps to exactly one `providers`, `addresses` and
//! `contact_info` row, and to zero or more rows in the 1:N tables. Reference
//! rows are shared across providers and keyed by [`ReferenceId`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ProviderType, ServiceCategory};
use crate::error::ModelError;
use crate::ids::{ProviderId, ReferenceId, ReferenceKind};
use crate::provider::NormalizedProvider;
use crate::reference::{ReferenceRow, ReferenceTables};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRow {
    pub id: ProviderId,
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub id_generated: bool,
    pub normalized_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRow {
    pub provider_id: ProviderId,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    pub provider_id: ProviderId,
    pub phone_number: String,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccreditationRow {
    pub provider_id: ProviderId,
    pub organization: String,
    pub license_number: String,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderServiceRow {
    pub provider_id: ProviderId,
    pub service: ServiceCategory,
}

/// Link between a provider and a shared reference row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReferenceRow {
    pub provider_id: ProviderId,
    pub kind: ReferenceKind,
    pub reference_id: ReferenceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalRows {
    pub provider: ProviderRow,
    pub address: AddressRow,
    pub contact: ContactRow,
    pub accreditations: Vec<AccreditationRow>,
    pub services: Vec<ProviderServiceRow>,
    /// Reference rows this provider needs to exist (upsert semantics).
    pub references: Vec<ReferenceRow>,
    pub reference_links: Vec<ProviderReferenceRow>,
}

impl RelationalRows {
    /// Flatten a provider into table rows.
    ///
    /// Fails if the provider references an id the tables do not hold.
    pub fn build(
        provider: &NormalizedProvider,
        tables: &ReferenceTables,
    ) -> Result<Self, ModelError> {
        let id = &provider.provider_id;
        let mut references = Vec::new();
        let mut reference_links = Vec::new();
        for (kind, reference_id) in provider.references() {
            let row = tables
                .get(reference_id)
                .ok_or_else(|| ModelError::MissingReference {
                    provider_id: id.to_string(),
                    reference_id: reference_id.to_string(),
                })?;
            references.push(row.clone());
            reference_links.push(ProviderReferenceRow {
                provider_id: id.clone(),
                kind,
                reference_id: reference_id.clone(),
            });
        }

        Ok(Self {
            provider: ProviderRow {
                id: id.clone(),
                provider_name: provider.provider_name.clone(),
                provider_type: provider.provider_type,
                id_generated: provider.id_generated,
                normalized_at: provider.normalized_at,
            },
            address: AddressRow {
                provider_id: id.clone(),
                street1: provider.address.street1.clone(),
                street2: provider.address.street2.clone(),
                city: provider.address.city.clone(),
                state: provider.address.state.clone(),
                zip_code: provider.address.zip_code.clone(),
                country: provider.address.country.clone(),
            },
            contact: ContactRow {
                provider_id: id.clone(),
                phone_number: provider.contact_info.phone_number.clone(),
                fax: provider.contact_info.fax.clone(),
                email: provider.contact_info.email.clone(),
                website: provider.contact_info.website.clone(),
            },
            accreditations: provider
                .accreditations
                .iter()
                .map(|a| AccreditationRow {
                    provider_id: id.clone(),
                    organization: a.organization.clone(),
                    license_number: a.license_number.clone(),
                    issue_date: a.issue_date,
                    expiration_date: a.expiration_date,
                    expired: a.expired,
                })
                .collect(),
            services: provider
                .services
                .iter()
                .map(|service| ProviderServiceRow {
                    provider_id: id.clone(),
                    service: *service,
                })
                .collect(),
            references,
            reference_links,
        })
    }

    /// Row count per table name.
    pub fn row_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        counts.insert("providers", 1);
        counts.insert("addresses", 1);
        counts.insert("contact_info", 1);
        counts.insert("accreditations", self.accreditations.len());
        counts.insert("provider_services", self.services.len());
        for kind in ReferenceKind::ALL {
            let links = self
                .reference_links
                .iter()
                .filter(|link| link.kind == kind)
                .count();
            counts.insert(kind.link_table_name(), links);
        }
        counts
    }
}
