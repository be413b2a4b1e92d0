//! Accreditation validity windows.

use chrono::NaiveDate;

use intake_model::ProviderDocument;

use crate::issue::Issue;

/// Issue date must not follow expiration; expired records are flagged only.
pub fn check(document: &ProviderDocument, as_of: NaiveDate) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (idx, accreditation) in document.accreditations.iter().enumerate() {
        let field = format!("accreditations[{idx}]");
        if accreditation.issue_date > accreditation.expiration_date {
            issues.push(Issue::DateOrder {
                field,
                issue_date: accreditation.issue_date,
                expiration_date: accreditation.expiration_date,
            });
            continue;
        }
        if accreditation.expiration_date < as_of {
            issues.push(Issue::AccreditationExpired {
                field,
                organization: accreditation.organization.clone(),
                expiration_date: accreditation.expiration_date,
                as_of,
            });
        }
    }
    issues
}
