//! Organizational policy rules for hospitals.

use intake_model::{ProviderDocument, ProviderType, ServiceCategory};

use crate::issue::Issue;
use crate::options::RuleOptions;

pub fn check(document: &ProviderDocument, options: &RuleOptions) -> Vec<Issue> {
    if document.provider_type != ProviderType::Hospital {
        return Vec::new();
    }

    let mut issues = Vec::new();
    if options.hospital_emergency.is_enabled()
        && !document.services.contains(&ServiceCategory::Emergency)
    {
        issues.push(Issue::HospitalEmergency {
            field: "services".to_string(),
        });
    }

    let mut offered = document.services.clone();
    offered.sort();
    offered.dedup();
    if options.hospital_service_breadth.is_enabled()
        && offered.len() < options.hospital_min_services
    {
        issues.push(Issue::HospitalServiceBreadth {
            field: "services".to_string(),
            offered: offered.len(),
            minimum: options.hospital_min_services,
        });
    }
    issues
}
