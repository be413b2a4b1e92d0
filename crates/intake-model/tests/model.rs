//! Tests for intake-model types.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use intake_model::{
    BatchOutcome, FailureKind, FailureSubject, KnownProviders, ModelError, NormalizedAccreditation,
    NormalizedAddress, NormalizedContact, NormalizedProvider, ProviderId, ProviderIndex,
    ProviderType, RecordSubmission, ReferenceKind, ReferenceRow, ReferenceTables, RelationalRows,
    RunStatistics, ServiceCategory, SubmissionStatus, ValidationFailure, ValidationStage,
};

fn provider(id: &str, name: &str, street: &str) -> NormalizedProvider {
    NormalizedProvider {
        provider_id: ProviderId::new(id).unwrap(),
        id_generated: false,
        provider_name: name.to_string(),
        provider_type: ProviderType::Clinic,
        address: NormalizedAddress {
            street1: street.to_string(),
            street2: None,
            city: "Boston".to_string(),
            state: "MA".to_string(),
            zip_code: "02139".to_string(),
            country: "USA".to_string(),
        },
        contact_info: NormalizedContact {
            phone_number: "+16175550100".to_string(),
            fax: None,
            email: None,
            website: None,
        },
        services: BTreeSet::from([ServiceCategory::PrimaryCare]),
        accreditations: vec![NormalizedAccreditation {
            organization: "Joint Commission".to_string(),
            license_number: "JC-1".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            expired: false,
        }],
        specialties: BTreeSet::new(),
        languages: BTreeSet::new(),
        insurance_accepted: BTreeSet::new(),
        normalized_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[test]
fn known_providers_tracks_active_and_retired_ids() {
    let a = provider("P-1", "Harbor Clinic", "1 Main St");
    let mut known = KnownProviders::from_providers([&a]);
    assert!(known.fingerprint(&a.provider_id).is_some());
    assert!(!known.is_retired(&a.provider_id));

    known.retire(&a.provider_id);
    assert!(known.fingerprint(&a.provider_id).is_none());
    assert!(known.is_retired(&a.provider_id));
    assert!(known.is_taken(&a.provider_id));
    assert_eq!(known.active_len(), 0);
    assert_eq!(known.retired_len(), 1);
}

#[test]
fn fingerprint_ignores_punctuation_and_case() {
    let a = provider("P-1", "St. Mary's Clinic", "1 Main St.");
    let b = provider("P-1", "ST MARYS CLINIC", "1 main st");
    assert!(a.fingerprint().differing_fields(&b.fingerprint()).is_empty());

    let c = provider("P-1", "Harbor Clinic", "9 Elm St");
    assert_eq!(
        a.fingerprint().differing_fields(&c.fingerprint()),
        vec!["provider_name", "address"]
    );
}

#[test]
fn relational_rows_link_every_reference() {
    let mut tables = ReferenceTables::new();
    let spanish = tables.insert(ReferenceRow::from_raw(ReferenceKind::Language, "Spanish").unwrap());
    let cardio =
        tables.insert(ReferenceRow::from_raw(ReferenceKind::Specialty, "Cardiology").unwrap());

    let mut p = provider("P-1", "Harbor Clinic", "1 Main St");
    p.languages.insert(spanish);
    p.specialties.insert(cardio);

    let rows = RelationalRows::build(&p, &tables).unwrap();
    assert_eq!(rows.address.provider_id, p.provider_id);
    assert_eq!(rows.references.len(), 2);
    let counts = rows.row_counts();
    assert_eq!(counts["providers"], 1);
    assert_eq!(counts["provider_languages"], 1);
    assert_eq!(counts["provider_specialties"], 1);
    assert_eq!(counts["provider_insurance"], 0);
    assert_eq!(counts["accreditations"], 1);
}

#[test]
fn relational_rows_fail_on_missing_reference() {
    let mut p = provider("P-1", "Harbor Clinic", "1 Main St");
    let orphan = ReferenceRow::from_raw(ReferenceKind::Insurance, "Aetna").unwrap();
    p.insurance_accepted.insert(orphan.id);

    let err = RelationalRows::build(&p, &ReferenceTables::new()).unwrap_err();
    assert!(matches!(err, ModelError::MissingReference { .. }));
}

#[test]
fn failure_subject_serializes_untagged() {
    let failure = ValidationFailure {
        subject: FailureSubject::Index(3),
        provider_name: None,
        stage: ValidationStage::Schema,
        field: "address.city".to_string(),
        rule: "required".to_string(),
        kind: FailureKind::Schema,
        message: "address.city is required".to_string(),
        recorded_at: DateTime::<Utc>::UNIX_EPOCH,
        source: None,
    };
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["provider_id_or_index"], 3);
    assert_eq!(json["kind"], "schema");

    let round: ValidationFailure = serde_json::from_value(json).unwrap();
    assert_eq!(round, failure);
}

#[test]
fn run_statistics_accumulate_batches() {
    let outcome = BatchOutcome {
        batch_index: 1,
        batch_id: Some("b-1".to_string()),
        records: vec![
            RecordSubmission {
                provider_id: ProviderId::new("P-1").unwrap(),
                status: SubmissionStatus::Submitted,
            },
            RecordSubmission {
                provider_id: ProviderId::new("P-2").unwrap(),
                status: SubmissionStatus::Failed {
                    reason: "rejected by remote".to_string(),
                },
            },
        ],
    };
    let mut stats = RunStatistics::default();
    stats.record_batch(&outcome);
    assert_eq!(stats.batches, 1);
    assert_eq!(stats.submitted, 1);
    assert_eq!(stats.submission_failed, 1);
}

#[test]
fn normalized_provider_round_trips_through_json() {
    let p = provider("P-1", "Harbor Clinic", "1 Main St");
    let json = serde_json::to_string(&p).unwrap();
    let round: NormalizedProvider = serde_json::from_str(&json).unwrap();
    assert_eq!(round, p);
}
