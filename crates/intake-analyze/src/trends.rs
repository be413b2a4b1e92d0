//! Corpus-level counts.

use std::collections::BTreeMap;

use intake_model::{LabelCount, NormalizedProvider, ReferenceKind, ReferenceTables, TrendSummary};

/// Aggregate counts over distinct providers in one pass.
///
/// Every map is keyed and every list sorted, so the summary does not depend
/// on input order.
pub fn summarize(
    providers: &[&NormalizedProvider],
    tables: &ReferenceTables,
    top_specialties: usize,
) -> TrendSummary {
    let mut summary = TrendSummary::default();
    let mut specialties: BTreeMap<String, usize> = BTreeMap::new();

    for provider in providers {
        bump(&mut summary.by_provider_type, provider.provider_type.as_str());
        bump(&mut summary.by_state, &provider.address.state);
        for service in &provider.services {
            bump(&mut summary.by_service, service.as_str());
        }
        for (kind, id) in provider.references() {
            let label = tables.label(id);
            match kind {
                ReferenceKind::Specialty => bump(&mut specialties, &label),
                ReferenceKind::Language => bump(&mut summary.by_language, &label),
                ReferenceKind::Insurance => bump(&mut summary.by_insurance, &label),
            }
        }

        let expired = provider.expired_accreditations();
        summary.expired_accreditations += expired;
        if expired > 0 {
            summary.providers_with_expired_accreditations += 1;
        }
    }

    summary.top_specialties = top_counts(specialties, top_specialties);
    summary
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_default() += 1;
}

/// Count descending, then label ascending, truncated to `limit`.
fn top_counts(counts: BTreeMap<String, usize>, limit: usize) -> Vec<LabelCount> {
    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_break_on_label() {
        let counts = BTreeMap::from([
            ("Pediatrics".to_string(), 2),
            ("Cardiology".to_string(), 2),
            ("Oncology".to_string(), 5),
            ("Dermatology".to_string(), 1),
        ]);
        let top = top_counts(counts, 3);
        let labels: Vec<_> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Oncology", "Cardiology", "Pediatrics"]);
    }
}
