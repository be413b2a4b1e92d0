use intake_model::{ProviderDocument, ServiceCategory};

use crate::issue::Issue;

/// At least one recognized service; `other` is recognized but noted.
pub fn check(document: &ProviderDocument) -> Vec<Issue> {
    if document.services.is_empty() {
        return vec![Issue::NoRecognizedService {
            field: "services".to_string(),
        }];
    }
    // Not indexed: lenient matching may have dropped earlier raw entries.
    if document.services.iter().any(ServiceCategory::is_other) {
        vec![Issue::OtherService {
            field: "services".to_string(),
        }]
    } else {
        Vec::new()
    }
}
