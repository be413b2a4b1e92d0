//! Accepted document to normalized provider.

use std::collections::BTreeSet;

use tracing::debug;

use intake_model::text::collapse_whitespace;
use intake_model::{
    AccreditationRecord, Address, ContactInfo, NormalizedAccreditation, NormalizedAddress,
    NormalizedContact, NormalizedProvider, ProviderDocument, ProviderIndex, ReferenceId,
    ReferenceKind, ReferenceRow, ReferenceTables, RelationalRows,
};
use intake_validate::normalize_phone;

use crate::error::NormalizationError;
use crate::identity::assign_provider_id;
use crate::types::{NormalizationContext, NormalizationOutput};

/// Normalize one accepted document.
///
/// Deterministic for a given document, snapshot and `as_of`; only
/// `normalized_at` varies between calls.
pub fn normalize<I: ProviderIndex + ?Sized>(
    document: &ProviderDocument,
    ctx: &NormalizationContext<'_, I>,
) -> Result<NormalizationOutput, NormalizationError> {
    let (provider_id, id_generated) = assign_provider_id(
        document.provider_id.as_ref(),
        &document.fingerprint(),
        ctx.index,
    )?;

    let mut references = ReferenceTables::new();
    let specialties = reference_set(
        ReferenceKind::Specialty,
        &document.specialties,
        &mut references,
    );
    let languages = reference_set(ReferenceKind::Language, &document.languages, &mut references);
    let insurance_accepted = reference_set(
        ReferenceKind::Insurance,
        &document.insurance_accepted,
        &mut references,
    );

    let provider = NormalizedProvider {
        provider_id,
        id_generated,
        provider_name: collapse_whitespace(&document.provider_name),
        provider_type: document.provider_type,
        address: normalize_address(&document.address),
        contact_info: normalize_contact(&document.contact_info)?,
        services: document.services.iter().copied().collect(),
        accreditations: normalize_accreditations(&document.accreditations, ctx),
        specialties,
        languages,
        insurance_accepted,
        normalized_at: ctx.normalized_at,
    };

    let rows = RelationalRows::build(&provider, &references)?;
    debug!(
        provider_id = %provider.provider_id,
        generated = id_generated,
        references = references.len(),
        "provider normalized"
    );

    Ok(NormalizationOutput {
        provider,
        references,
        rows,
    })
}

fn normalize_address(address: &Address) -> NormalizedAddress {
    NormalizedAddress {
        street1: collapse_whitespace(&address.street1),
        street2: address
            .street2
            .as_deref()
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty()),
        city: collapse_whitespace(&address.city),
        state: collapse_whitespace(&address.state).to_uppercase(),
        zip_code: address.zip_code.trim().to_string(),
        country: collapse_whitespace(&address.country),
    }
}

fn normalize_contact(contact: &ContactInfo) -> Result<NormalizedContact, NormalizationError> {
    let phone_number =
        normalize_phone(&contact.phone_number).map_err(|source| NormalizationError::Phone {
            field: "contact_info.phone_number",
            source,
        })?;
    let fax = contact
        .fax
        .as_deref()
        .map(normalize_phone)
        .transpose()
        .map_err(|source| NormalizationError::Phone {
            field: "contact_info.fax",
            source,
        })?;

    Ok(NormalizedContact {
        phone_number,
        fax,
        email: contact.email.as_deref().map(|e| e.trim().to_lowercase()),
        website: contact.website.as_deref().map(|w| w.trim().to_string()),
    })
}

/// Sorted, duplicate-free accreditations with expiry flags.
fn normalize_accreditations<I: ?Sized>(
    records: &[AccreditationRecord],
    ctx: &NormalizationContext<'_, I>,
) -> Vec<NormalizedAccreditation> {
    records
        .iter()
        .map(|record| NormalizedAccreditation {
            organization: collapse_whitespace(&record.organization),
            license_number: collapse_whitespace(&record.license_number),
            issue_date: record.issue_date,
            expiration_date: record.expiration_date,
            expired: record.expiration_date < ctx.as_of,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn reference_set(
    kind: ReferenceKind,
    values: &[String],
    tables: &mut ReferenceTables,
) -> BTreeSet<ReferenceId> {
    values
        .iter()
        .filter_map(|raw| ReferenceRow::from_raw(kind, raw))
        .map(|row| tables.insert(row))
        .collect()
}
