//! Validation options.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use intake_model::FailureKind;

/// How unknown `services` entries are treated by the schema stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMatching {
    /// Unknown entries are schema errors.
    #[default]
    Strict,
    /// Unknown entries are dropped with a soft warning.
    Lenient,
}

/// Maximum character counts for free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub provider_name: usize,
    pub street: usize,
    pub city: usize,
    pub state: usize,
    pub country: usize,
    pub phone: usize,
    pub email: usize,
    pub website: usize,
    pub organization: usize,
    pub license_number: usize,
    /// Specialty, language and insurance entries.
    pub reference_value: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            provider_name: 200,
            street: 200,
            city: 100,
            state: 50,
            country: 60,
            phone: 32,
            email: 254,
            website: 2048,
            organization: 200,
            license_number: 64,
            reference_value: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    pub service_matching: ServiceMatching,
    pub limits: FieldLimits,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_matching(mut self, matching: ServiceMatching) -> Self {
        self.service_matching = matching;
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Severity of an organizational policy rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyLevel {
    /// Rule is not evaluated.
    Off,
    /// Recorded as a soft warning.
    #[default]
    Warn,
    /// Rejects the document.
    Reject,
}

impl PolicyLevel {
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PolicyLevel::Off => None,
            PolicyLevel::Warn => Some(FailureKind::SoftWarning),
            PolicyLevel::Reject => Some(FailureKind::BusinessRule),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, PolicyLevel::Off)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    /// Reference date for accreditation expiry.
    pub as_of: NaiveDate,
    pub hospital_emergency: PolicyLevel,
    pub hospital_service_breadth: PolicyLevel,
    pub hospital_min_services: usize,
}

impl Default for RuleOptions {
    /// Uses today's UTC date; pin it with [`RuleOptions::with_as_of`] for
    /// reproducible runs.
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl RuleOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            hospital_emergency: PolicyLevel::Warn,
            hospital_service_breadth: PolicyLevel::Warn,
            hospital_min_services: 3,
        }
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_hospital_emergency(mut self, level: PolicyLevel) -> Self {
        self.hospital_emergency = level;
        self
    }

    pub fn with_hospital_service_breadth(mut self, level: PolicyLevel) -> Self {
        self.hospital_service_breadth = level;
        self
    }

    pub fn with_hospital_min_services(mut self, minimum: usize) -> Self {
        self.hospital_min_services = minimum;
        self
    }
}
