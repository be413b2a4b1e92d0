use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use serde_json::{Value, json};

use intake_model::{
    FailureKind, FailureSubject, KnownProviders, ProviderFingerprint, ProviderId, ProviderIndex,
    ValidationStage,
};
use intake_model::text::comparison_key;
use intake_validate::{
    DocumentContext, PolicyLevel, RuleOptions, SchemaOptions, ServiceMatching, Validator,
    validate_schema,
};

/// Snapshot holding a single active provider and optional retired ids.
struct Snapshot {
    id: ProviderId,
    fingerprint: ProviderFingerprint,
    retired: Vec<ProviderId>,
}

impl ProviderIndex for Snapshot {
    fn fingerprint(&self, id: &ProviderId) -> Option<ProviderFingerprint> {
        (id == &self.id).then(|| self.fingerprint.clone())
    }

    fn is_retired(&self, id: &ProviderId) -> bool {
        self.retired.contains(id)
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn ctx(position: usize) -> DocumentContext {
    DocumentContext::new(position, DateTime::<Utc>::UNIX_EPOCH)
}

fn validator<I: ProviderIndex>(index: I) -> Validator<I> {
    Validator::new(index).with_rule_options(RuleOptions::new(as_of()))
}

fn clinic() -> Value {
    json!({
        "provider_id": "P-001",
        "provider_name": "Harbor Family Clinic",
        "provider_type": "clinic",
        "address": {
            "street1": "40 Harbor Way",
            "city": "Portland",
            "state": "ME",
            "zip_code": "04101-2200"
        },
        "contact_info": {
            "phone_number": "207-555-0142",
            "fax": "(207) 555-0143"
        },
        "services": ["primary_care", "pediatrics"],
        "accreditations": [{
            "organization": "State Board",
            "license_number": "ME-4410",
            "issue_date": "2021-03-01",
            "expiration_date": "2028-03-01"
        }],
        "languages": ["English", "French"]
    })
}

#[test]
fn accepts_clean_document_without_failures() {
    let verdict = validator(KnownProviders::new()).validate(&clinic(), &ctx(0));
    assert!(verdict.is_accepted());
    assert!(verdict.failures.is_empty(), "{:?}", verdict.failures);
    assert_eq!(verdict.subject, FailureSubject::ProviderId("P-001".to_string()));
}

#[test]
fn reversed_accreditation_dates_fail_date_order() {
    let mut doc = clinic();
    doc["accreditations"] = json!([{
        "organization": "State Board",
        "license_number": "ME-4410",
        "issue_date": "2026-01-01",
        "expiration_date": "2025-01-01"
    }]);

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert!(!verdict.is_accepted());
    let failure = verdict.hard_failures().next().expect("failure");
    assert_eq!(failure.rule, "date-order");
    assert_eq!(failure.kind, FailureKind::BusinessRule);
    assert_eq!(failure.stage, ValidationStage::BusinessRules);
    assert_eq!(failure.field, "accreditations[0]");
    assert_eq!(verdict.rejected_at(), Some(ValidationStage::BusinessRules));
}

#[test]
fn expired_accreditation_is_flagged_but_accepted() {
    let mut doc = clinic();
    doc["accreditations"][0]["expiration_date"] = json!("2025-12-31");

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert!(verdict.is_accepted());
    assert!(verdict.has_soft_warnings());
    assert_eq!(verdict.failures[0].rule, "accreditation-expired");
}

#[test]
fn malformed_phone_and_fax_are_both_reported() {
    let mut doc = clinic();
    doc["contact_info"]["phone_number"] = json!("555-0142");
    doc["contact_info"]["fax"] = json!("fax me");

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert!(!verdict.is_accepted());
    let fields: Vec<_> = verdict.failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["contact_info.phone_number", "contact_info.fax"]);
    assert!(verdict.failures.iter().all(|f| f.rule == "phone-format"));
}

#[test]
fn other_service_counts_but_is_noted() {
    let mut doc = clinic();
    doc["services"] = json!(["other"]);

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert!(verdict.is_accepted());
    assert_eq!(verdict.failures.len(), 1);
    assert_eq!(verdict.failures[0].rule, "services-other");
    assert_eq!(verdict.failures[0].kind, FailureKind::SoftWarning);
}

#[test]
fn empty_services_fail_recognition() {
    let mut doc = clinic();
    doc["services"] = json!([]);

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert!(!verdict.is_accepted());
    assert_eq!(verdict.failures[0].rule, "services-recognized");
}

#[test]
fn conflicting_id_is_a_contradiction() {
    let snapshot = Snapshot {
        id: ProviderId::new("P-001").unwrap(),
        fingerprint: ProviderFingerprint {
            name_key: "bayside dental".to_string(),
            address_key: "9 shore rd|portland|ME|04101".to_string(),
        },
        retired: Vec::new(),
    };

    let verdict = validator(snapshot).validate(&clinic(), &ctx(0));
    assert!(!verdict.is_accepted());
    assert!(verdict.is_contradiction());
    let failure = &verdict.failures[0];
    assert_eq!(failure.rule, "id-contradiction");
    assert!(failure.message.contains("provider_name, address"));
}

#[test]
fn resubmitting_same_provider_is_not_a_contradiction() {
    let snapshot = Snapshot {
        id: ProviderId::new("P-001").unwrap(),
        fingerprint: ProviderFingerprint {
            name_key: "harbor family clinic".to_string(),
            address_key: "40 harbor way|portland|ME|04101".to_string(),
        },
        retired: Vec::new(),
    };

    let verdict = validator(snapshot).validate(&clinic(), &ctx(0));
    assert!(verdict.is_accepted(), "{:?}", verdict.failures);
}

#[test]
fn non_ascii_case_change_is_not_a_contradiction() {
    let snapshot = Snapshot {
        id: ProviderId::new("P-100").unwrap(),
        fingerprint: ProviderFingerprint {
            name_key: comparison_key("ÉCOLE SANTÉ CLINIC"),
            address_key: "40 harbor way|portland|ME|04101".to_string(),
        },
        retired: Vec::new(),
    };
    let mut doc = clinic();
    doc["provider_id"] = json!("P-100");
    doc["provider_name"] = json!("École Santé Clinic");

    let verdict = validator(snapshot).validate(&doc, &ctx(0));
    assert!(verdict.is_accepted(), "{:?}", verdict.failures);
    assert!(!verdict.is_contradiction());
}

#[test]
fn other_service_names_the_services_field_after_lenient_drop() {
    let mut doc = clinic();
    doc["services"] = json!(["aromatherapy", "other"]);
    let lenient = validator(KnownProviders::new()).with_schema_options(
        SchemaOptions::default().with_service_matching(ServiceMatching::Lenient),
    );

    let verdict = lenient.validate(&doc, &ctx(0));
    assert!(verdict.is_accepted(), "{:?}", verdict.failures);
    let other = verdict
        .failures
        .iter()
        .find(|f| f.rule == "services-other")
        .expect("services-other note");
    assert_eq!(other.field, "services");
}

#[test]
fn retired_id_cannot_be_reused() {
    let known = KnownProviders::new().with_retired([ProviderId::new("P-001").unwrap()]);
    let verdict = validator(known).validate(&clinic(), &ctx(0));
    assert!(verdict.is_contradiction());
    assert_eq!(verdict.failures[0].rule, "id-retired");
}

#[test]
fn hospital_policy_is_soft_unless_configured() {
    let mut doc = clinic();
    doc["provider_type"] = json!("Hospital");

    let soft = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert!(soft.is_accepted());
    let rules: Vec<_> = soft.failures.iter().map(|f| f.rule.as_str()).collect();
    assert_eq!(rules, vec!["hospital-emergency", "hospital-service-breadth"]);

    let strict = Validator::new(KnownProviders::new()).with_rule_options(
        RuleOptions::new(as_of())
            .with_hospital_emergency(PolicyLevel::Reject)
            .with_hospital_service_breadth(PolicyLevel::Off),
    );
    let verdict = strict.validate(&doc, &ctx(0));
    assert!(!verdict.is_accepted());
    assert_eq!(verdict.failures.len(), 1);
    assert_eq!(verdict.failures[0].kind, FailureKind::BusinessRule);
}

#[test]
fn schema_failures_use_position_without_usable_id() {
    let mut doc = clinic();
    doc.as_object_mut().unwrap().remove("provider_id");
    doc["address"]["zip_code"] = json!("ME 04101");

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(7));
    assert!(!verdict.is_accepted());
    assert_eq!(verdict.subject, FailureSubject::Index(7));
    assert_eq!(verdict.failures[0].stage, ValidationStage::Schema);
    assert_eq!(
        verdict.failures[0].provider_name.as_deref(),
        Some("Harbor Family Clinic")
    );
}

#[test]
fn schema_failure_skips_business_rules() {
    let mut doc = clinic();
    doc["provider_name"] = json!(null);
    doc["contact_info"]["phone_number"] = json!("12");

    let verdict = validator(KnownProviders::new()).validate(&doc, &ctx(0));
    assert_eq!(verdict.failures.len(), 1);
    assert_eq!(verdict.failures[0].rule, "required");
}

const REQUIRED_PATHS: &[&str] = &[
    "provider_name",
    "provider_type",
    "address",
    "address.street1",
    "address.city",
    "address.state",
    "address.zip_code",
    "contact_info",
    "contact_info.phone_number",
    "services",
    "accreditations",
    "accreditations[0].organization",
    "accreditations[0].license_number",
    "accreditations[0].issue_date",
    "accreditations[0].expiration_date",
];

/// Parent object and key for a dotted path with an optional `[0]` segment.
fn slot<'a>(doc: &'a mut Value, path: &str) -> (&'a mut serde_json::Map<String, Value>, String) {
    let mut parent = doc;
    let segments: Vec<&str> = path.split('.').collect();
    for segment in &segments[..segments.len() - 1] {
        parent = match segment.strip_suffix("[0]") {
            Some(key) => &mut parent[key][0],
            None => &mut parent[*segment],
        };
    }
    let key = segments[segments.len() - 1].to_string();
    (parent.as_object_mut().unwrap(), key)
}

proptest! {
    #[test]
    fn missing_required_field_is_reported(idx in 0..REQUIRED_PATHS.len(), mode in 0u8..3) {
        let path = REQUIRED_PATHS[idx];
        let mut doc = clinic();
        let (parent, key) = slot(&mut doc, path);
        match mode {
            0 => {
                parent.remove(&key);
            }
            1 => {
                parent.insert(key, Value::Null);
            }
            _ => {
                parent.insert(key, json!("   "));
            }
        }

        let outcome = validate_schema(&doc, &SchemaOptions::default());
        prop_assert!(outcome.document.is_none());
        prop_assert!(outcome.errors().any(|issue| issue.field() == path));
    }

    #[test]
    fn schema_never_accepts_with_errors(name in "[ A-Za-z]{0,12}", zip in "[0-9-]{0,11}") {
        let mut doc = clinic();
        doc["provider_name"] = json!(name);
        doc["address"]["zip_code"] = json!(zip);

        let outcome = validate_schema(&doc, &SchemaOptions::default());
        prop_assert!(outcome.is_accepted() != (outcome.errors().count() > 0));
    }
}
