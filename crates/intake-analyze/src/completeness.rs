//! Optional-field completeness.

use std::collections::BTreeMap;

use intake_model::{Completeness, NormalizedProvider};

use crate::score::round4;

/// Optional fields and whether a provider has them populated.
const OPTIONAL_FIELDS: &[(&str, fn(&NormalizedProvider) -> bool)] = &[
    ("address.street2", |p| p.address.street2.is_some()),
    ("contact_info.fax", |p| p.contact_info.fax.is_some()),
    ("contact_info.email", |p| p.contact_info.email.is_some()),
    ("contact_info.website", |p| p.contact_info.website.is_some()),
    ("specialties", |p| !p.specialties.is_empty()),
    ("languages", |p| !p.languages.is_empty()),
    ("insurance_accepted", |p| !p.insurance_accepted.is_empty()),
    ("accreditations", |p| !p.accreditations.is_empty()),
];

/// Missing counts per optional field, and the populated share overall.
///
/// An empty corpus scores 1.0.
pub fn measure(providers: &[&NormalizedProvider]) -> Completeness {
    let mut fields_missing = BTreeMap::new();
    let mut missing_total = 0;
    for (field, present) in OPTIONAL_FIELDS {
        let missing = providers.iter().filter(|p| !present(p)).count();
        missing_total += missing;
        fields_missing.insert((*field).to_string(), missing);
    }

    let slots = providers.len() * OPTIONAL_FIELDS.len();
    let score = if slots == 0 {
        1.0
    } else {
        round4(1.0 - missing_total as f64 / slots as f64)
    };

    Completeness {
        fields_missing,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus_is_complete() {
        let completeness = measure(&[]);
        assert_eq!(completeness.score, 1.0);
        assert_eq!(completeness.fields_missing.len(), OPTIONAL_FIELDS.len());
        assert!(completeness.fields_missing.values().all(|&n| n == 0));
    }
}
