//! Canonical text helpers shared by validation, normalization, and analysis.

/// Collapse internal whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key: collapsed whitespace, case-folded.
///
/// "Spanish", " spanish " and "SPANISH" share one key.
pub fn canonical_key(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

/// Key used to compare names and streets across records.
///
/// Lowercases, drops punctuation, and collapses whitespace so that
/// "St. Mary's  Hospital" and "st marys hospital" compare equal.
pub fn comparison_key(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|ch| {
            if ch.is_alphanumeric() {
                Some(ch)
            } else if ch.is_whitespace() || ch == '-' || ch == '/' || ch == ',' {
                Some(' ')
            } else {
                None
            }
        })
        .collect();
    collapse_whitespace(&cleaned)
}

/// Digits of a phone-like value, in order.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// First five digits of a ZIP code.
pub fn zip5(raw: &str) -> String {
    digits_only(raw).chars().take(5).collect()
}

/// Key for "is this the same place", ignoring punctuation, case and ZIP+4.
pub fn address_key(street1: &str, city: &str, state: &str, zip_code: &str) -> String {
    format!(
        "{}|{}|{}|{}",
        comparison_key(street1),
        comparison_key(city),
        collapse_whitespace(state).to_uppercase(),
        zip5(zip_code)
    )
}
