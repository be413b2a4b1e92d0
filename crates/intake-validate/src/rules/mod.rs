//! Business-rule checks over schema-accepted documents.
//!
//! Each module performs one family of cross-field or semantic checks.

mod accreditations;
mod contact;
mod identity;
mod policy;
mod services;

use intake_model::{ProviderDocument, ProviderIndex};

use crate::issue::Issue;
use crate::options::RuleOptions;

/// Inputs shared by every rule check.
pub struct RuleContext<'a, I: ProviderIndex + ?Sized> {
    pub options: &'a RuleOptions,
    pub index: &'a I,
}

impl<'a, I: ProviderIndex + ?Sized> RuleContext<'a, I> {
    pub fn new(options: &'a RuleOptions, index: &'a I) -> Self {
        Self { options, index }
    }
}

/// Run all business-rule checks on one document.
///
/// Every check runs; issues come back in check order.
pub fn run_all<I: ProviderIndex + ?Sized>(
    document: &ProviderDocument,
    ctx: &RuleContext<'_, I>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    // 1. Identifier contradictions against the known-provider snapshot
    issues.extend(identity::check(document, ctx.index));

    // 2. Accreditation date order and expiry
    issues.extend(accreditations::check(document, ctx.options.as_of));

    // 3. Recognized services
    issues.extend(services::check(document));

    // 4. Phone and fax shape
    issues.extend(contact::check(document));

    // 5. Organizational policy (hospital services)
    issues.extend(policy::check(document, ctx.options));

    issues
}
