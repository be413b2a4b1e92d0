//! Cross-provider consistency checks.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use intake_model::{
    Inconsistency, InconsistencyKind, NormalizedProvider, ProviderType, ServiceCategory,
};

use crate::config::AnalyzerConfig;

/// Capitalized words, replaced by a placeholder to expose a name's shape.
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("Invalid word regex"));

/// Patterns listed in a naming finding.
const MAX_REPORTED_PATTERNS: usize = 5;

/// Run every consistency check.
pub fn check(providers: &[&NormalizedProvider], config: &AnalyzerConfig) -> Vec<Inconsistency> {
    let mut findings = naming_patterns(providers, config);
    findings.extend(hospital_core_services(providers, config));
    findings
}

/// Shape of a provider name, e.g. `Greenwood Medical Center` -> `[Word] [Word] [Word]`.
pub fn name_pattern(name: &str) -> String {
    WORD_REGEX.replace_all(name, "[Word]").into_owned()
}

fn naming_patterns(
    providers: &[&NormalizedProvider],
    config: &AnalyzerConfig,
) -> Vec<Inconsistency> {
    let mut by_type: BTreeMap<ProviderType, Vec<&NormalizedProvider>> = BTreeMap::new();
    for provider in providers {
        by_type.entry(provider.provider_type).or_default().push(provider);
    }

    by_type
        .into_iter()
        .filter(|(_, group)| group.len() >= config.naming_min_group)
        .filter_map(|(provider_type, group)| {
            let patterns: BTreeSet<String> =
                group.iter().map(|p| name_pattern(&p.provider_name)).collect();
            if patterns.len() <= config.naming_max_patterns {
                return None;
            }
            Some(Inconsistency {
                kind: InconsistencyKind::NamingPatterns,
                provider_type: Some(provider_type),
                details: patterns.into_iter().take(MAX_REPORTED_PATTERNS).collect(),
                recommendation: format!(
                    "Standardize {provider_type} naming conventions"
                ),
            })
        })
        .collect()
}

fn hospital_core_services(
    providers: &[&NormalizedProvider],
    config: &AnalyzerConfig,
) -> Option<Inconsistency> {
    let hospitals: Vec<&BTreeSet<ServiceCategory>> = providers
        .iter()
        .filter(|p| p.provider_type == ProviderType::Hospital)
        .map(|p| &p.services)
        .collect();
    if hospitals.len() < config.hospital_min_group {
        return None;
    }

    let (first, rest) = hospitals.split_first()?;
    let common: BTreeSet<ServiceCategory> = rest.iter().fold((*first).clone(), |acc, services| {
        acc.intersection(services).copied().collect()
    });
    if common.len() >= config.hospital_min_common_services {
        return None;
    }

    let mut details = vec![format!(
        "{} hospitals share {} common services",
        hospitals.len(),
        common.len()
    )];
    details.extend(common.iter().map(|s| s.as_str().to_string()));
    Some(Inconsistency {
        kind: InconsistencyKind::HospitalCoreServices,
        provider_type: Some(ProviderType::Hospital),
        details,
        recommendation: "Define standard core services for hospitals".to_string(),
    })
}
