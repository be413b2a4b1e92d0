//! Provider document validation.
//!
//! [`schema`] checks shape, types and formats of a raw JSON document;
//! [`rules`] checks cross-field and semantic constraints on the typed
//! document; [`Validator`] runs both and records [`ValidationFailure`]s.
//!
//! [`ValidationFailure`]: intake_model::ValidationFailure

pub mod issue;
pub mod options;
pub mod phone;
pub mod rules;
pub mod schema;
mod validator;

pub use issue::{Category, Issue};
pub use options::{FieldLimits, PolicyLevel, RuleOptions, SchemaOptions, ServiceMatching};
pub use phone::{PhoneError, normalize_phone};
pub use rules::{RuleContext, run_all};
pub use schema::{SchemaOutcome, validate_schema};
pub use validator::{DocumentContext, Validator, Verdict};
