//! Type-safe enumerations for provider categories.
//!
//! Input files spell these values loosely ("Primary Care", "primary-care",
//! "PRIMARY_CARE"), so parsing goes through [`enum_token`] before matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Normalize a raw enumeration value into its snake_case token.
///
/// Trims, lowercases, and maps runs of spaces, hyphens, and slashes to a
/// single underscore.
pub fn enum_token(raw: &str) -> String {
    let mut token = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' || ch == '/' {
            pending_sep = !token.is_empty();
            continue;
        }
        if pending_sep {
            token.push('_');
            pending_sep = false;
        }
        token.extend(ch.to_lowercase());
    }
    token
}

/// Kind of provider being onboarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Hospital,
    Clinic,
    Practice,
    IndividualProvider,
    UrgentCare,
    Laboratory,
    Pharmacy,
}

impl ProviderType {
    pub const ALL: [ProviderType; 7] = [
        ProviderType::Hospital,
        ProviderType::Clinic,
        ProviderType::Practice,
        ProviderType::IndividualProvider,
        ProviderType::UrgentCare,
        ProviderType::Laboratory,
        ProviderType::Pharmacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Hospital => "hospital",
            ProviderType::Clinic => "clinic",
            ProviderType::Practice => "practice",
            ProviderType::IndividualProvider => "individual_provider",
            ProviderType::UrgentCare => "urgent_care",
            ProviderType::Laboratory => "laboratory",
            ProviderType::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = enum_token(s);
        ProviderType::ALL
            .into_iter()
            .find(|t| t.as_str() == token)
            .ok_or_else(|| ModelError::UnknownProviderType(s.to_string()))
    }
}

/// Recognized service categories.
///
/// `Other` is recognized but ambiguous; the business rules ask for
/// specialties to disambiguate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    PrimaryCare,
    SpecialtyCare,
    Emergency,
    Surgery,
    Diagnostic,
    MentalHealth,
    Rehabilitation,
    Pediatrics,
    Geriatrics,
    Obstetrics,
    Gynecology,
    Other,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 12] = [
        ServiceCategory::PrimaryCare,
        ServiceCategory::SpecialtyCare,
        ServiceCategory::Emergency,
        ServiceCategory::Surgery,
        ServiceCategory::Diagnostic,
        ServiceCategory::MentalHealth,
        ServiceCategory::Rehabilitation,
        ServiceCategory::Pediatrics,
        ServiceCategory::Geriatrics,
        ServiceCategory::Obstetrics,
        ServiceCategory::Gynecology,
        ServiceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::PrimaryCare => "primary_care",
            ServiceCategory::SpecialtyCare => "specialty_care",
            ServiceCategory::Emergency => "emergency",
            ServiceCategory::Surgery => "surgery",
            ServiceCategory::Diagnostic => "diagnostic",
            ServiceCategory::MentalHealth => "mental_health",
            ServiceCategory::Rehabilitation => "rehabilitation",
            ServiceCategory::Pediatrics => "pediatrics",
            ServiceCategory::Geriatrics => "geriatrics",
            ServiceCategory::Obstetrics => "obstetrics",
            ServiceCategory::Gynecology => "gynecology",
            ServiceCategory::Other => "other",
        }
    }

    /// Returns true for the catch-all category.
    pub fn is_other(&self) -> bool {
        matches!(self, ServiceCategory::Other)
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = enum_token(s);
        ServiceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| ModelError::UnknownServiceCategory(s.to_string()))
    }
}
