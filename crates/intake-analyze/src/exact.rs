//! Exact duplicates: records sharing a provider id.

use std::collections::{BTreeMap, BTreeSet};

use intake_model::{
    Contradiction, ContradictionVariant, CoreFields, ExactDuplicateGroup, ExactDuplicateKind,
    NormalizedProvider, ProviderId,
};

/// Records grouped by provider id, ids in ascending order.
pub fn group_by_id(
    providers: &[NormalizedProvider],
) -> BTreeMap<&ProviderId, Vec<&NormalizedProvider>> {
    let mut groups: BTreeMap<&ProviderId, Vec<&NormalizedProvider>> = BTreeMap::new();
    for provider in providers {
        groups.entry(&provider.provider_id).or_default().push(provider);
    }
    groups
}

/// Classify every id seen more than once.
pub fn check(
    groups: &BTreeMap<&ProviderId, Vec<&NormalizedProvider>>,
) -> (Vec<ExactDuplicateGroup>, Vec<Contradiction>) {
    let mut duplicates = Vec::new();
    let mut contradictions = Vec::new();

    for (id, records) in groups {
        if records.len() < 2 {
            continue;
        }
        let cores: BTreeSet<CoreFields> = records.iter().map(|p| p.core_fields()).collect();
        let kind = if cores.len() == 1 {
            ExactDuplicateKind::Resubmission
        } else {
            ExactDuplicateKind::Contradiction
        };
        duplicates.push(ExactDuplicateGroup {
            provider_id: (*id).clone(),
            record_count: records.len(),
            kind,
        });

        if kind == ExactDuplicateKind::Contradiction {
            contradictions.push(Contradiction {
                provider_id: (*id).clone(),
                differing_fields: differing_fields(&cores),
                variants: records
                    .iter()
                    .map(|p| variant(p))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
            });
        }
    }

    (duplicates, contradictions)
}

/// Union of fields that differ between any two distinct core-field sets.
fn differing_fields(cores: &BTreeSet<CoreFields>) -> Vec<String> {
    let mut fields = BTreeSet::new();
    let all: Vec<_> = cores.iter().collect();
    for (i, left) in all.iter().enumerate() {
        for right in &all[i + 1..] {
            fields.extend(left.differing_fields(right));
        }
    }
    fields.into_iter().map(str::to_string).collect()
}

fn variant(provider: &NormalizedProvider) -> ContradictionVariant {
    let address = &provider.address;
    ContradictionVariant {
        provider_name: provider.provider_name.clone(),
        provider_type: provider.provider_type,
        address: format!(
            "{}, {}, {} {}",
            address.street1, address.city, address.state, address.zip_code
        ),
        phone_number: provider.contact_info.phone_number.clone(),
    }
}

/// One record per id for corpus-level statistics.
///
/// Picks the most recently normalized record; ties break on the serialized
/// form so the choice does not depend on input order.
pub fn representative<'a>(records: &[&'a NormalizedProvider]) -> Option<&'a NormalizedProvider> {
    if records.len() == 1 {
        return records.first().copied();
    }
    records
        .iter()
        .map(|p| (p.normalized_at, serde_json::to_string(p).unwrap_or_default(), *p))
        .max_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)))
        .map(|(_, _, p)| p)
}
