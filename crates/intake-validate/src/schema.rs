//! Schema validation of raw provider documents.
//!
//! Checks presence, JSON types, formats, enumerations and length limits over
//! the whole document before deciding; every problem found is reported, not
//! just the first. Unknown fields are ignored.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use intake_model::{
    AccreditationRecord, Address, ContactInfo, DEFAULT_COUNTRY, ProviderDocument, ProviderId,
    ProviderType, ServiceCategory,
};

use crate::issue::Issue;
use crate::options::{FieldLimits, SchemaOptions, ServiceMatching};

static ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("Invalid ZIP regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

/// Result of schema validation.
///
/// `document` is present exactly when no rejecting issue was found; `issues`
/// may still hold soft warnings in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOutcome {
    pub document: Option<ProviderDocument>,
    pub issues: Vec<Issue>,
}

impl SchemaOutcome {
    pub fn is_accepted(&self) -> bool {
        self.document.is_some()
    }

    /// Issues that reject the document.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.default_kind().is_hard())
    }
}

/// Validate one raw document.
pub fn validate_schema(raw: &Value, options: &SchemaOptions) -> SchemaOutcome {
    let Some(root) = raw.as_object() else {
        return SchemaOutcome {
            document: None,
            issues: vec![Issue::WrongType {
                field: "$".to_string(),
                expected: "an object".to_string(),
            }],
        };
    };

    let mut reader = FieldReader::new(options);
    let limits = options.limits;

    let provider_id = reader.provider_id(root);
    let provider_name = reader.text(root, "", "provider_name", limits.provider_name, true);
    let provider_type = reader.provider_type(root);
    let address = reader.address(root);
    let contact_info = reader.contact_info(root);
    let services = reader.services(root);
    let accreditations = reader.accreditations(root);
    let specialties = reader.text_list(root, "specialties");
    let languages = reader.text_list(root, "languages");
    let insurance_accepted = reader.text_list(root, "insurance_accepted");

    let issues = reader.issues;
    if issues.iter().any(|i| i.default_kind().is_hard()) {
        return SchemaOutcome {
            document: None,
            issues,
        };
    }

    let (
        Some(provider_name),
        Some(provider_type),
        Some(address),
        Some(contact_info),
        Some(services),
        Some(accreditations),
    ) = (
        provider_name,
        provider_type,
        address,
        contact_info,
        services,
        accreditations,
    )
    else {
        // Every missing piece above pushes a rejecting issue.
        return SchemaOutcome {
            document: None,
            issues,
        };
    };

    SchemaOutcome {
        document: Some(ProviderDocument {
            provider_id: provider_id.flatten(),
            provider_name,
            provider_type,
            address,
            contact_info,
            services,
            accreditations,
            specialties,
            languages,
            insurance_accepted,
        }),
        issues,
    }
}

fn path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

struct FieldReader<'a> {
    matching: ServiceMatching,
    limits: &'a FieldLimits,
    issues: Vec<Issue>,
}

impl<'a> FieldReader<'a> {
    fn new(options: &'a SchemaOptions) -> Self {
        Self {
            matching: options.service_matching,
            limits: &options.limits,
            issues: Vec::new(),
        }
    }

    /// Read a trimmed string. Blank counts as absent.
    fn text(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        max_len: usize,
        required: bool,
    ) -> Option<String> {
        let field = path(prefix, key);
        match obj.get(key) {
            None | Some(Value::Null) => {
                if required {
                    self.issues.push(Issue::RequiredMissing { field });
                }
                None
            }
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    if required {
                        self.issues.push(Issue::RequiredMissing { field });
                    }
                    return None;
                }
                self.within_limit(field, trimmed, max_len)
            }
            Some(_) => {
                self.issues.push(Issue::WrongType {
                    field,
                    expected: "a string".to_string(),
                });
                None
            }
        }
    }

    fn within_limit(&mut self, field: String, value: &str, max_len: usize) -> Option<String> {
        let found = value.chars().count();
        if found > max_len {
            self.issues.push(Issue::TextTooLong {
                field,
                max_allowed: max_len,
                found,
            });
            return None;
        }
        Some(value.to_string())
    }

    /// Read a nested object. `None` when absent or mistyped.
    fn object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.issues.push(Issue::RequiredMissing {
                    field: key.to_string(),
                });
                None
            }
            Some(Value::Object(inner)) => Some(inner),
            Some(_) => {
                self.issues.push(Issue::WrongType {
                    field: key.to_string(),
                    expected: "an object".to_string(),
                });
                None
            }
        }
    }

    /// Read an array, treating absence per `required`.
    fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        required: bool,
    ) -> Option<&'v [Value]> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                if required {
                    self.issues.push(Issue::RequiredMissing {
                        field: key.to_string(),
                    });
                    None
                } else {
                    Some(&[] as &[Value])
                }
            }
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(_) => {
                self.issues.push(Issue::WrongType {
                    field: key.to_string(),
                    expected: "an array".to_string(),
                });
                None
            }
        }
    }

    /// Outer `None` means the field was unusable; inner `None` means absent.
    fn provider_id(&mut self, root: &Map<String, Value>) -> Option<Option<ProviderId>> {
        let value = match root.get("provider_id") {
            None | Some(Value::Null) => return Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Some(None),
            Some(Value::String(s)) => s,
            Some(_) => {
                self.issues.push(Issue::WrongType {
                    field: "provider_id".to_string(),
                    expected: "a string".to_string(),
                });
                return None;
            }
        };
        match ProviderId::new(value.as_str()) {
            Ok(id) => Some(Some(id)),
            Err(_) => {
                self.issues.push(Issue::InvalidProviderId {
                    field: "provider_id".to_string(),
                    value: value.clone(),
                });
                None
            }
        }
    }

    fn provider_type(&mut self, root: &Map<String, Value>) -> Option<ProviderType> {
        let raw = self.text(root, "", "provider_type", 64, true)?;
        match raw.parse::<ProviderType>() {
            Ok(provider_type) => Some(provider_type),
            Err(_) => {
                self.issues.push(Issue::UnknownProviderType {
                    field: "provider_type".to_string(),
                    value: raw,
                });
                None
            }
        }
    }

    fn address(&mut self, root: &Map<String, Value>) -> Option<Address> {
        let obj = self.object(root, "address")?;
        let limits = self.limits;
        let street1 = self.text(obj, "address", "street1", limits.street, true);
        let street2 = self.text(obj, "address", "street2", limits.street, false);
        let city = self.text(obj, "address", "city", limits.city, true);
        let state = self.text(obj, "address", "state", limits.state, true);
        let zip_code = self.text(obj, "address", "zip_code", 10, true).and_then(|zip| {
            if ZIP_REGEX.is_match(&zip) {
                Some(zip)
            } else {
                self.issues.push(Issue::InvalidZip {
                    field: "address.zip_code".to_string(),
                    value: zip,
                });
                None
            }
        });
        let country = self
            .text(obj, "address", "country", limits.country, false)
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        Some(Address {
            street1: street1?,
            street2,
            city: city?,
            state: state?,
            zip_code: zip_code?,
            country,
        })
    }

    fn contact_info(&mut self, root: &Map<String, Value>) -> Option<ContactInfo> {
        let obj = self.object(root, "contact_info")?;
        let limits = self.limits;
        let phone_number = self.text(obj, "contact_info", "phone_number", limits.phone, true);
        let fax = self.text(obj, "contact_info", "fax", limits.phone, false);
        let email = self
            .text(obj, "contact_info", "email", limits.email, false)
            .map(|email| {
                if EMAIL_REGEX.is_match(&email) {
                    Ok(email)
                } else {
                    self.issues.push(Issue::InvalidEmail {
                        field: "contact_info.email".to_string(),
                    });
                    Err(())
                }
            });
        let website = self
            .text(obj, "contact_info", "website", limits.website, false)
            .map(|website| match check_website(&website) {
                Ok(()) => Ok(website),
                Err(reason) => {
                    self.issues.push(Issue::InvalidUrl {
                        field: "contact_info.website".to_string(),
                        reason,
                    });
                    Err(())
                }
            });

        Some(ContactInfo {
            phone_number: phone_number?,
            fax,
            email: email.transpose().ok()?,
            website: website.transpose().ok()?,
        })
    }

    fn services(&mut self, root: &Map<String, Value>) -> Option<Vec<ServiceCategory>> {
        let items = self.array(root, "services", true)?;
        let mut services = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let field = format!("services[{idx}]");
            let Some(raw) = item.as_str() else {
                self.issues.push(Issue::WrongType {
                    field,
                    expected: "a string".to_string(),
                });
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            match raw.parse::<ServiceCategory>() {
                Ok(service) => services.push(service),
                Err(_) => self.issues.push(Issue::UnknownService {
                    field,
                    value: raw.trim().to_string(),
                    dropped: self.matching == ServiceMatching::Lenient,
                }),
            }
        }
        Some(services)
    }

    fn accreditations(&mut self, root: &Map<String, Value>) -> Option<Vec<AccreditationRecord>> {
        let items = self.array(root, "accreditations", true)?;
        let limits = self.limits;
        let mut records = Vec::with_capacity(items.len());
        let mut complete = true;
        for (idx, item) in items.iter().enumerate() {
            let prefix = format!("accreditations[{idx}]");
            let Some(obj) = item.as_object() else {
                self.issues.push(Issue::WrongType {
                    field: prefix,
                    expected: "an object".to_string(),
                });
                complete = false;
                continue;
            };
            let organization = self.text(obj, &prefix, "organization", limits.organization, true);
            let license_number =
                self.text(obj, &prefix, "license_number", limits.license_number, true);
            let issue_date = self.date(obj, &prefix, "issue_date");
            let expiration_date = self.date(obj, &prefix, "expiration_date");
            match (organization, license_number, issue_date, expiration_date) {
                (Some(organization), Some(license_number), Some(issue_date), Some(expiration_date)) => {
                    records.push(AccreditationRecord {
                        organization,
                        license_number,
                        issue_date,
                        expiration_date,
                    });
                }
                _ => complete = false,
            }
        }
        complete.then_some(records)
    }

    fn date(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<NaiveDate> {
        let raw = self.text(obj, prefix, key, 32, true)?;
        let parsed = DATE_REGEX
            .is_match(&raw)
            .then(|| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok())
            .flatten();
        if parsed.is_none() {
            self.issues.push(Issue::InvalidDate {
                field: path(prefix, key),
                value: raw,
            });
        }
        parsed
    }

    /// Optional list of free-text strings. Blank entries are skipped.
    fn text_list(&mut self, root: &Map<String, Value>, key: &str) -> Vec<String> {
        let Some(items) = self.array(root, key, false) else {
            return Vec::new();
        };
        let max_len = self.limits.reference_value;
        let mut values = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let field = format!("{key}[{idx}]");
            match item {
                Value::Null => {}
                Value::String(s) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(value) = self.within_limit(field, trimmed, max_len) {
                        values.push(value);
                    }
                }
                _ => self.issues.push(Issue::WrongType {
                    field,
                    expected: "a string".to_string(),
                }),
            }
        }
        values
    }
}

fn check_website(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    match url.host_str() {
        Some(host) if host.contains('.') || host == "localhost" => Ok(()),
        _ => Err("missing host".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "provider_id": "P-001",
            "provider_name": "Greenwood Medical Center",
            "provider_type": "Hospital",
            "address": {
                "street1": "12 Elm Street",
                "city": "Springfield",
                "state": "MA",
                "zip_code": "01103"
            },
            "contact_info": {
                "phone_number": "(413) 555-0100",
                "email": "info@greenwood.example.org",
                "website": "https://greenwood.example.org"
            },
            "services": ["Emergency", "primary-care", "SURGERY"],
            "accreditations": [{
                "organization": "Joint Commission",
                "license_number": "JC-1",
                "issue_date": "2022-01-01",
                "expiration_date": "2027-01-01"
            }],
            "specialties": ["Cardiology", "  "],
            "languages": ["English"],
            "extra_field": 42
        })
    }

    #[test]
    fn accepts_valid_document_and_defaults_country() {
        let outcome = validate_schema(&valid(), &SchemaOptions::default());
        assert!(outcome.issues.is_empty(), "{:?}", outcome.issues);
        let doc = outcome.document.expect("accepted");
        assert_eq!(doc.address.country, "USA");
        assert_eq!(doc.provider_type, ProviderType::Hospital);
        assert_eq!(doc.services.len(), 3);
        assert_eq!(doc.specialties, vec!["Cardiology".to_string()]);
        assert!(doc.insurance_accepted.is_empty());
    }

    #[test]
    fn collects_every_problem() {
        let mut doc = valid();
        doc["address"]["zip_code"] = json!("1103");
        doc["contact_info"]["email"] = json!("not-an-email");
        doc["contact_info"]["website"] = json!("ftp://greenwood.example.org");
        doc["accreditations"][0]["issue_date"] = json!("01/01/2022");
        doc["provider_type"] = json!("spa");

        let outcome = validate_schema(&doc, &SchemaOptions::default());
        assert!(!outcome.is_accepted());
        let rules: Vec<_> = outcome.issues.iter().map(Issue::rule_id).collect();
        assert_eq!(
            rules,
            vec![
                "provider-type",
                "zip-format",
                "email-format",
                "url-format",
                "date-format"
            ]
        );
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        let mut doc = valid();
        doc["accreditations"][0]["expiration_date"] = json!("2027-02-30");
        let outcome = validate_schema(&doc, &SchemaOptions::default());
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].field(), "accreditations[0].expiration_date");
    }

    #[test]
    fn missing_sub_object_reports_its_path() {
        let mut doc = valid();
        doc.as_object_mut().unwrap().remove("address");
        let outcome = validate_schema(&doc, &SchemaOptions::default());
        assert!(outcome.document.is_none());
        assert!(outcome.issues.iter().any(|i| i.field() == "address"));
    }

    #[test]
    fn lenient_matching_drops_unknown_services() {
        let mut doc = valid();
        doc["services"] = json!(["emergency", "aromatherapy"]);
        let strict = validate_schema(&doc, &SchemaOptions::default());
        assert!(!strict.is_accepted());

        let options = SchemaOptions::new().with_service_matching(ServiceMatching::Lenient);
        let lenient = validate_schema(&doc, &options);
        let accepted = lenient.document.as_ref().expect("accepted");
        assert_eq!(accepted.services, vec![ServiceCategory::Emergency]);
        assert_eq!(lenient.issues.len(), 1);
        assert_eq!(lenient.errors().count(), 0);
    }

    #[test]
    fn text_limits_apply() {
        let mut doc = valid();
        doc["provider_name"] = json!("x".repeat(201));
        let outcome = validate_schema(&doc, &SchemaOptions::default());
        assert!(matches!(
            outcome.issues.as_slice(),
            [Issue::TextTooLong { found: 201, .. }]
        ));
    }

    #[test]
    fn non_object_root_is_a_type_error() {
        let outcome = validate_schema(&json!(["not", "a", "document"]), &SchemaOptions::default());
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].rule_id(), "type");
    }
}
