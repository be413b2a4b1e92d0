//! Validation issue types.
//!
//! Each variant carries only the data its message needs. Issues are plain
//! data: the validator turns them into `ValidationFailure` records once the
//! subject and timestamp are known.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use intake_model::{FailureKind, ValidationStage};

use crate::options::RuleOptions;

/// Issue category, used for grouping in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Presence,
    Type,
    Format,
    Limit,
    Terminology,
    Consistency,
    Identity,
    Policy,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Presence => "Presence",
            Self::Type => "Type",
            Self::Format => "Format",
            Self::Limit => "Limit",
            Self::Terminology => "Terminology",
            Self::Consistency => "Consistency",
            Self::Identity => "Identity",
            Self::Policy => "Policy",
        }
    }

    /// Stage that produces issues of this category.
    pub fn stage(&self) -> ValidationStage {
        match self {
            Self::Presence | Self::Type | Self::Format | Self::Limit | Self::Terminology => {
                ValidationStage::Schema
            }
            Self::Consistency | Self::Identity | Self::Policy => ValidationStage::BusinessRules,
        }
    }
}

/// Validation issue - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    // Presence checks
    /// Required field is absent, null, or blank
    RequiredMissing { field: String },

    // Type checks
    /// Field holds the wrong JSON type
    WrongType { field: String, expected: String },

    // Format checks
    /// Supplied provider id is not a usable identifier
    InvalidProviderId { field: String, value: String },
    /// ZIP code is not `NNNNN` or `NNNNN-NNNN`
    InvalidZip { field: String, value: String },
    /// Email address is not syntactically valid
    InvalidEmail { field: String },
    /// Website is not an absolute http(s) URL
    InvalidUrl { field: String, reason: String },
    /// Date is not a calendar date in `YYYY-MM-DD` form
    InvalidDate { field: String, value: String },

    // Limit checks
    /// Text value exceeds its maximum length
    TextTooLong {
        field: String,
        max_allowed: usize,
        found: usize,
    },

    // Terminology checks
    /// Provider type is not a known category
    UnknownProviderType { field: String, value: String },
    /// Service entry is not a known category; `dropped` when matching is lenient
    UnknownService {
        field: String,
        value: String,
        dropped: bool,
    },

    // Consistency checks
    /// Accreditation expires before it was issued
    DateOrder {
        field: String,
        issue_date: NaiveDate,
        expiration_date: NaiveDate,
    },
    /// Accreditation has already expired
    AccreditationExpired {
        field: String,
        organization: String,
        expiration_date: NaiveDate,
        as_of: NaiveDate,
    },
    /// No recognized service category remains
    NoRecognizedService { field: String },
    /// The catch-all `other` service needs specialties to disambiguate it
    OtherService { field: String },
    /// Phone or fax does not normalize to an E.164 number
    PhoneFormat { field: String, reason: String },

    // Identity checks
    /// Provider id is already held by a materially different provider
    IdContradiction {
        field: String,
        provider_id: String,
        differing_fields: Vec<String>,
    },
    /// Provider id belonged to a deleted provider
    IdRetired { field: String, provider_id: String },

    // Policy checks
    /// Hospital does not list emergency services
    HospitalEmergency { field: String },
    /// Hospital lists fewer service categories than the policy minimum
    HospitalServiceBreadth {
        field: String,
        offered: usize,
        minimum: usize,
    },
}

impl Issue {
    /// Stable rule identifier recorded on failures.
    pub fn rule_id(&self) -> &'static str {
        match self {
            Issue::RequiredMissing { .. } => "required",
            Issue::WrongType { .. } => "type",
            Issue::InvalidProviderId { .. } => "provider-id-format",
            Issue::InvalidZip { .. } => "zip-format",
            Issue::InvalidEmail { .. } => "email-format",
            Issue::InvalidUrl { .. } => "url-format",
            Issue::InvalidDate { .. } => "date-format",
            Issue::TextTooLong { .. } => "max-length",
            Issue::UnknownProviderType { .. } => "provider-type",
            Issue::UnknownService { .. } => "service-category",
            Issue::DateOrder { .. } => "date-order",
            Issue::AccreditationExpired { .. } => "accreditation-expired",
            Issue::NoRecognizedService { .. } => "services-recognized",
            Issue::OtherService { .. } => "services-other",
            Issue::PhoneFormat { .. } => "phone-format",
            Issue::IdContradiction { .. } => "id-contradiction",
            Issue::IdRetired { .. } => "id-retired",
            Issue::HospitalEmergency { .. } => "hospital-emergency",
            Issue::HospitalServiceBreadth { .. } => "hospital-service-breadth",
        }
    }

    /// Dotted field path (all issues have one).
    pub fn field(&self) -> &str {
        match self {
            Issue::RequiredMissing { field }
            | Issue::WrongType { field, .. }
            | Issue::InvalidProviderId { field, .. }
            | Issue::InvalidZip { field, .. }
            | Issue::InvalidEmail { field }
            | Issue::InvalidUrl { field, .. }
            | Issue::InvalidDate { field, .. }
            | Issue::TextTooLong { field, .. }
            | Issue::UnknownProviderType { field, .. }
            | Issue::UnknownService { field, .. }
            | Issue::DateOrder { field, .. }
            | Issue::AccreditationExpired { field, .. }
            | Issue::NoRecognizedService { field }
            | Issue::OtherService { field }
            | Issue::PhoneFormat { field, .. }
            | Issue::IdContradiction { field, .. }
            | Issue::IdRetired { field, .. }
            | Issue::HospitalEmergency { field }
            | Issue::HospitalServiceBreadth { field, .. } => field,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Issue::RequiredMissing { .. } => Category::Presence,
            Issue::WrongType { .. } => Category::Type,
            Issue::InvalidProviderId { .. }
            | Issue::InvalidZip { .. }
            | Issue::InvalidEmail { .. }
            | Issue::InvalidUrl { .. }
            | Issue::InvalidDate { .. } => Category::Format,
            Issue::TextTooLong { .. } => Category::Limit,
            Issue::UnknownProviderType { .. } | Issue::UnknownService { .. } => {
                Category::Terminology
            }
            Issue::DateOrder { .. }
            | Issue::AccreditationExpired { .. }
            | Issue::NoRecognizedService { .. }
            | Issue::OtherService { .. }
            | Issue::PhoneFormat { .. } => Category::Consistency,
            Issue::IdContradiction { .. } | Issue::IdRetired { .. } => Category::Identity,
            Issue::HospitalEmergency { .. } | Issue::HospitalServiceBreadth { .. } => {
                Category::Policy
            }
        }
    }

    pub fn stage(&self) -> ValidationStage {
        self.category().stage()
    }

    /// Failure kind before policy overrides.
    pub fn default_kind(&self) -> FailureKind {
        match self {
            Issue::UnknownService { dropped: true, .. }
            | Issue::AccreditationExpired { .. }
            | Issue::OtherService { .. }
            | Issue::HospitalEmergency { .. }
            | Issue::HospitalServiceBreadth { .. } => FailureKind::SoftWarning,
            Issue::IdContradiction { .. } | Issue::IdRetired { .. } => FailureKind::Contradiction,
            issue if issue.stage() == ValidationStage::Schema => FailureKind::Schema,
            _ => FailureKind::BusinessRule,
        }
    }

    /// Failure kind with the configured policy levels applied.
    pub fn kind(&self, options: &RuleOptions) -> FailureKind {
        let level = match self {
            Issue::HospitalEmergency { .. } => options.hospital_emergency,
            Issue::HospitalServiceBreadth { .. } => options.hospital_service_breadth,
            _ => return self.default_kind(),
        };
        level.failure_kind().unwrap_or(FailureKind::SoftWarning)
    }

    /// Human-readable message. Contact values are never echoed.
    pub fn message(&self) -> String {
        match self {
            Issue::RequiredMissing { field } => format!("{field} is required"),
            Issue::WrongType { field, expected } => format!("{field} must be {expected}"),
            Issue::InvalidProviderId { field, value } => format!(
                "{field} {value:?} is not a valid identifier (non-blank, no spaces, at most 64 characters)"
            ),
            Issue::InvalidZip { field, value } => {
                format!("{field} {value:?} must be NNNNN or NNNNN-NNNN")
            }
            Issue::InvalidEmail { field } => format!("{field} is not a valid email address"),
            Issue::InvalidUrl { field, reason } => {
                format!("{field} is not a valid website URL: {reason}")
            }
            Issue::InvalidDate { field, value } => {
                format!("{field} {value:?} must be a date in format YYYY-MM-DD")
            }
            Issue::TextTooLong {
                field,
                max_allowed,
                found,
            } => format!("{field} has {found} characters, exceeding max length {max_allowed}"),
            Issue::UnknownProviderType { field, value } => {
                format!("{field} {value:?} is not a recognized provider type")
            }
            Issue::UnknownService {
                field,
                value,
                dropped,
            } => {
                if *dropped {
                    format!("{field} {value:?} is not a recognized service category and was dropped")
                } else {
                    format!("{field} {value:?} is not a recognized service category")
                }
            }
            Issue::DateOrder {
                field,
                issue_date,
                expiration_date,
            } => format!(
                "{field}: issue_date {issue_date} is after expiration_date {expiration_date}"
            ),
            Issue::AccreditationExpired {
                field,
                organization,
                expiration_date,
                as_of,
            } => format!(
                "{field}: accreditation from {organization} expired on {expiration_date} (as of {as_of})"
            ),
            Issue::NoRecognizedService { field } => {
                format!("{field} must contain at least one recognized service category")
            }
            Issue::OtherService { field } => format!(
                "{field} is \"other\"; specialties should describe the service"
            ),
            Issue::PhoneFormat { field, reason } => {
                format!("{field} is not a valid phone number: {reason}")
            }
            Issue::IdContradiction {
                provider_id,
                differing_fields,
                ..
            } => format!(
                "provider_id {provider_id} already belongs to a provider with different {}",
                differing_fields.join(", ")
            ),
            Issue::IdRetired { provider_id, .. } => {
                format!("provider_id {provider_id} belonged to a deleted provider and cannot be reused")
            }
            Issue::HospitalEmergency { .. } => "Hospitals should offer emergency services".to_string(),
            Issue::HospitalServiceBreadth {
                offered, minimum, ..
            } => format!(
                "Hospitals should offer at least {minimum} service categories (found {offered})"
            ),
        }
    }
}
