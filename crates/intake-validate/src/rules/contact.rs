//! Phone and fax shape.

use intake_model::ProviderDocument;

use crate::issue::Issue;
use crate::phone::normalize_phone;

pub fn check(document: &ProviderDocument) -> Vec<Issue> {
    let contact = &document.contact_info;
    let numbers = [
        ("contact_info.phone_number", Some(&contact.phone_number)),
        ("contact_info.fax", contact.fax.as_ref()),
    ];

    numbers
        .into_iter()
        .filter_map(|(field, value)| {
            let err = normalize_phone(value?).err()?;
            Some(Issue::PhoneFormat {
                field: field.to_string(),
                reason: err.to_string(),
            })
        })
        .collect()
}
