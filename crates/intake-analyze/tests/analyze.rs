use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use intake_analyze::{AnalysisError, Analyzer, AnalyzerConfig};
use intake_model::{
    ExactDuplicateKind, InconsistencyKind, NormalizedAddress, NormalizedContact,
    NormalizedProvider, ProviderId, ProviderType, ReferenceId, ReferenceKind, ReferenceRow,
    ReferenceTables, ServiceCategory,
};

fn provider(id: &str, name: &str, state: &str, phone: &str) -> NormalizedProvider {
    NormalizedProvider {
        provider_id: ProviderId::new(id).unwrap(),
        id_generated: false,
        provider_name: name.to_string(),
        provider_type: ProviderType::Hospital,
        address: NormalizedAddress {
            street1: "12 Elm Street".to_string(),
            street2: None,
            city: "Springfield".to_string(),
            state: state.to_string(),
            zip_code: "01103".to_string(),
            country: "USA".to_string(),
        },
        contact_info: NormalizedContact {
            phone_number: phone.to_string(),
            fax: None,
            email: None,
            website: None,
        },
        services: BTreeSet::from([ServiceCategory::Emergency, ServiceCategory::Surgery]),
        accreditations: Vec::new(),
        specialties: BTreeSet::new(),
        languages: BTreeSet::new(),
        insurance_accepted: BTreeSet::new(),
        normalized_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

fn analyze(providers: &[NormalizedProvider]) -> intake_model::AnalysisReport {
    Analyzer::default()
        .analyze(providers, &ReferenceTables::new())
        .unwrap()
}

#[test]
fn misspelled_name_is_a_fuzzy_candidate() {
    let report = analyze(&[
        provider("P-001", "Greenwood Medical Center", "MA", "+14135550100"),
        provider("P-002", "Greenwod Medical Center", "MA", "+14135550100"),
        provider("P-003", "Bayside Dental", "ME", "+12075550199"),
    ]);

    assert_eq!(report.fuzzy_candidates.len(), 1);
    let candidate = &report.fuzzy_candidates[0];
    assert_eq!(candidate.left.provider_id.as_str(), "P-001");
    assert_eq!(candidate.right.provider_id.as_str(), "P-002");
    assert!(candidate.score >= 0.85, "score {}", candidate.score);
    assert!(candidate.blocking_keys.contains(&"gree|MA".to_string()));
    assert!(candidate.blocking_keys.contains(&"phone:14135550100".to_string()));
    assert!(report.exact_duplicates.is_empty());
}

#[test]
fn different_states_are_not_blocked_together_without_phone() {
    let config = AnalyzerConfig::default().with_phone_blocking(false);
    let report = Analyzer::new(config)
        .analyze(
            &[
                provider("P-001", "Greenwood Medical Center", "MA", "+14135550100"),
                provider("P-002", "Greenwood Medical Center", "NH", "+16035550100"),
            ],
            &ReferenceTables::new(),
        )
        .unwrap();
    assert!(report.fuzzy_candidates.is_empty());
}

#[test]
fn same_id_same_fields_is_a_resubmission_not_a_candidate() {
    let first = provider("P-001", "Greenwood Medical Center", "MA", "+14135550100");
    let mut second = first.clone();
    second.normalized_at += Duration::days(1);

    let report = analyze(&[first, second]);
    assert_eq!(report.provider_count, 1);
    assert_eq!(report.record_count, 2);
    assert_eq!(report.exact_duplicates.len(), 1);
    assert_eq!(report.exact_duplicates[0].kind, ExactDuplicateKind::Resubmission);
    assert_eq!(report.exact_duplicates[0].record_count, 2);
    assert!(report.contradictions.is_empty());
    assert!(report.fuzzy_candidates.is_empty());
}

#[test]
fn same_id_different_phone_is_a_contradiction() {
    let first = provider("P-001", "Greenwood Medical Center", "MA", "+14135550100");
    let second = provider("P-001", "Greenwood Medical Center", "MA", "+14135550999");

    let report = analyze(&[first, second]);
    assert_eq!(report.exact_duplicates[0].kind, ExactDuplicateKind::Contradiction);
    assert_eq!(report.contradictions.len(), 1);
    let contradiction = &report.contradictions[0];
    assert_eq!(contradiction.differing_fields, vec!["contact_info.phone_number"]);
    assert_eq!(contradiction.variants.len(), 2);
}

#[test]
fn missing_reference_row_is_fatal() {
    let mut orphan = provider("P-001", "Greenwood Medical Center", "MA", "+14135550100");
    let dangling = ReferenceId::derive(ReferenceKind::Specialty, "cardiology");
    orphan.specialties.insert(dangling.clone());

    let err = Analyzer::default()
        .analyze(&[orphan], &ReferenceTables::new())
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::MissingReference {
            provider_id: ProviderId::new("P-001").unwrap(),
            reference_id: dangling,
        }
    );
}

#[test]
fn trends_use_reference_labels() {
    let mut tables = ReferenceTables::new();
    let cardiology =
        tables.insert(ReferenceRow::from_raw(ReferenceKind::Specialty, "Cardiology").unwrap());
    let spanish =
        tables.insert(ReferenceRow::from_raw(ReferenceKind::Language, "Spanish").unwrap());

    let mut a = provider("P-001", "Greenwood Medical Center", "MA", "+14135550100");
    a.specialties.insert(cardiology.clone());
    a.languages.insert(spanish);
    let mut b = provider("P-002", "Bayside Dental", "ME", "+12075550199");
    b.provider_type = ProviderType::Practice;
    b.specialties.insert(cardiology);

    let report = Analyzer::default().analyze(&[a, b], &tables).unwrap();
    let trends = &report.trends;
    assert_eq!(trends.by_provider_type["hospital"], 1);
    assert_eq!(trends.by_provider_type["practice"], 1);
    assert_eq!(trends.by_state["MA"], 1);
    assert_eq!(trends.by_service["emergency"], 2);
    assert_eq!(trends.by_language["Spanish"], 1);
    assert_eq!(trends.top_specialties[0].label, "Cardiology");
    assert_eq!(trends.top_specialties[0].count, 2);
}

#[test]
fn hospitals_without_shared_core_services_are_flagged() {
    let services = [
        ServiceCategory::Emergency,
        ServiceCategory::Surgery,
        ServiceCategory::Obstetrics,
        ServiceCategory::Pediatrics,
    ];
    let providers: Vec<_> = services
        .iter()
        .enumerate()
        .map(|(i, service)| {
            let mut p = provider(
                &format!("H-{i}"),
                &format!("Hospital {i}"),
                "MA",
                &format!("+1413555010{i}"),
            );
            p.services = BTreeSet::from([*service]);
            p
        })
        .collect();

    let report = analyze(&providers);
    let finding = report
        .inconsistencies
        .iter()
        .find(|f| f.kind == InconsistencyKind::HospitalCoreServices)
        .expect("hospital finding");
    assert_eq!(finding.provider_type, Some(ProviderType::Hospital));
    assert_eq!(finding.details[0], "4 hospitals share 0 common services");
}

#[test]
fn completeness_counts_missing_optional_fields() {
    let mut a = provider("P-001", "Greenwood Medical Center", "MA", "+14135550100");
    a.contact_info.email = Some("info@greenwood.example.org".to_string());
    let b = provider("P-002", "Bayside Dental", "ME", "+12075550199");

    let report = analyze(&[a, b]);
    let completeness = &report.completeness;
    assert_eq!(completeness.fields_missing["contact_info.email"], 1);
    assert_eq!(completeness.fields_missing["contact_info.fax"], 2);
    // 1 of 16 optional slots populated
    assert_eq!(completeness.score, 0.0625);
}

#[test]
fn report_json_is_stable_across_runs_and_input_order() {
    let mut providers = vec![
        provider("P-003", "Bayside Dental", "ME", "+12075550199"),
        provider("P-001", "Greenwood Medical Center", "MA", "+14135550100"),
        provider("P-002", "Greenwod Medical Center", "MA", "+14135550100"),
        provider("P-001", "Greenwood Medical Centre", "MA", "+14135550100"),
    ];
    let first = serde_json::to_string(&analyze(&providers)).unwrap();
    let second = serde_json::to_string(&analyze(&providers)).unwrap();
    assert_eq!(first, second);

    providers.reverse();
    let reversed = serde_json::to_string(&analyze(&providers)).unwrap();
    assert_eq!(first, reversed);
}

proptest! {
    #[test]
    fn hospital_count_ignores_input_order(count in 1usize..24, rotation in any::<usize>()) {
        let mut providers: Vec<_> = (0..count)
            .map(|i| provider(&format!("H-{i:03}"), &format!("Hospital {i}"), "MA", "+14135550100"))
            .collect();
        providers.rotate_left(rotation % count);

        let report = analyze(&providers);
        prop_assert_eq!(report.trends.by_provider_type["hospital"], count);
        prop_assert_eq!(report.provider_count, count);
    }
}
