//! Provider id assignment.
//!
//! A supplied id is kept as is. A missing id is derived from the provider's
//! name and address fingerprint, so the same document always gets the same
//! id. The salt is bumped past ids that are retired or held by a different
//! provider.

use intake_model::{ProviderFingerprint, ProviderId, ProviderIndex};

use crate::error::NormalizationError;

pub const MAX_ID_ATTEMPTS: u32 = 1024;

/// Returns the id and whether it was generated.
pub fn assign_provider_id<I: ProviderIndex + ?Sized>(
    supplied: Option<&ProviderId>,
    fingerprint: &ProviderFingerprint,
    index: &I,
) -> Result<(ProviderId, bool), NormalizationError> {
    if let Some(id) = supplied {
        return Ok((id.clone(), false));
    }

    let seed = format!("{}\0{}", fingerprint.name_key, fingerprint.address_key);
    for salt in 0..MAX_ID_ATTEMPTS {
        let candidate = ProviderId::derive(&seed, salt);
        if index.is_retired(&candidate) {
            continue;
        }
        match index.fingerprint(&candidate) {
            Some(existing) if &existing != fingerprint => continue,
            // Free, or already assigned to this same provider.
            _ => return Ok((candidate, true)),
        }
    }
    Err(NormalizationError::IdSpaceExhausted {
        attempts: MAX_ID_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_model::KnownProviders;

    fn fingerprint(name: &str) -> ProviderFingerprint {
        ProviderFingerprint {
            name_key: name.to_string(),
            address_key: "1 main st|boston|MA|02139".to_string(),
        }
    }

    #[test]
    fn supplied_id_is_kept() {
        let id = ProviderId::new("P-9").unwrap();
        let (assigned, generated) =
            assign_provider_id(Some(&id), &fingerprint("a"), &KnownProviders::new()).unwrap();
        assert_eq!(assigned, id);
        assert!(!generated);
    }

    #[test]
    fn retired_ids_are_skipped() {
        let fp = fingerprint("harbor clinic");
        let (first, generated) = assign_provider_id(None, &fp, &KnownProviders::new()).unwrap();
        assert!(generated);

        let known = KnownProviders::new().with_retired([first.clone()]);
        let (second, _) = assign_provider_id(None, &fp, &known).unwrap();
        assert_ne!(first, second);
        assert!(second.as_str().starts_with(ProviderId::GENERATED_PREFIX));
    }
}
