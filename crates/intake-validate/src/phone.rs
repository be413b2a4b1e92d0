//! Phone number normalization to E.164.
//!
//! Bare numbers are read as North American: ten digits, or eleven with a
//! leading `1`. Numbers written with a leading `+` may use any country code.

use thiserror::Error;

const SEPARATORS: &[char] = &[' ', '-', '.', '(', ')', '/'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("value is empty")]
    Empty,
    #[error("contains characters other than digits and separators")]
    InvalidCharacters,
    #[error("has {digits} digits")]
    WrongLength { digits: usize },
    #[error("area code {0} is not valid")]
    InvalidAreaCode(String),
    #[error("country code cannot start with 0")]
    InvalidCountryCode,
}

/// Strip separators and format as `+<country><number>`.
pub fn normalize_phone(raw: &str) -> Result<String, PhoneError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Empty);
    }

    let (international, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if !SEPARATORS.contains(&ch) {
            return Err(PhoneError::InvalidCharacters);
        }
    }

    if international {
        if digits.starts_with('1') {
            return north_american(&digits[1..]);
        }
        if digits.starts_with('0') {
            return Err(PhoneError::InvalidCountryCode);
        }
        if !(8..=15).contains(&digits.len()) {
            return Err(PhoneError::WrongLength {
                digits: digits.len(),
            });
        }
        return Ok(format!("+{digits}"));
    }

    match digits.len() {
        10 => north_american(&digits),
        11 if digits.starts_with('1') => north_american(&digits[1..]),
        len => Err(PhoneError::WrongLength { digits: len }),
    }
}

fn north_american(national: &str) -> Result<String, PhoneError> {
    if national.len() != 10 {
        return Err(PhoneError::WrongLength {
            digits: national.len() + 1,
        });
    }
    let area = &national[..3];
    if area.starts_with('0') || area.starts_with('1') {
        return Err(PhoneError::InvalidAreaCode(area.to_string()));
    }
    Ok(format!("+1{national}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_north_american_numbers() {
        assert_eq!(normalize_phone("(617) 555-0100").unwrap(), "+16175550100");
        assert_eq!(normalize_phone("1-617-555-0100").unwrap(), "+16175550100");
        assert_eq!(normalize_phone("+1 617.555.0100").unwrap(), "+16175550100");
        assert_eq!(normalize_phone("6175550100").unwrap(), "+16175550100");
    }

    #[test]
    fn keeps_international_numbers() {
        assert_eq!(normalize_phone("+44 20 7946 0958").unwrap(), "+442079460958");
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert_eq!(normalize_phone(""), Err(PhoneError::Empty));
        assert_eq!(
            normalize_phone("555-0100"),
            Err(PhoneError::WrongLength { digits: 7 })
        );
        assert_eq!(
            normalize_phone("617-555-0100 ext 4"),
            Err(PhoneError::InvalidCharacters)
        );
        assert_eq!(
            normalize_phone("(017) 555-0100"),
            Err(PhoneError::InvalidAreaCode("017".to_string()))
        );
        assert_eq!(normalize_phone("+0 12345678"), Err(PhoneError::InvalidCountryCode));
    }

    #[test]
    fn normalization_is_stable() {
        let once = normalize_phone("(617) 555-0100").unwrap();
        assert_eq!(normalize_phone(&once).unwrap(), once);
    }
}
