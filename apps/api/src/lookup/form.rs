//! Form-level validation of a phone number before it is submitted.
//!
//! Stricter than the details endpoint, which only rejects empty input.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// E.164-like: optional `+`, no leading zero, 2 to 15 digits.
static INTERNATIONAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Phone number is required.")]
    Required,

    #[error("Please enter a valid international phone number (e.g., +12025550123).")]
    NotInternational,
}

#[derive(Debug, Serialize)]
pub struct FormValidation {
    pub valid: bool,
    pub message: Option<String>,
}

impl From<Result<(), FormError>> for FormValidation {
    fn from(result: Result<(), FormError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                message: None,
            },
            Err(e) => Self {
                valid: false,
                message: Some(e.to_string()),
            },
        }
    }
}

pub fn validate_form_input(phone_number: &str) -> Result<(), FormError> {
    if phone_number.is_empty() {
        return Err(FormError::Required);
    }
    if !INTERNATIONAL_NUMBER.is_match(phone_number) {
        return Err(FormError::NotInternational);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_international_numbers() {
        for ok in ["+16502530000", "16502530000", "+442071234567", "+12", "+123456789012345"] {
            assert_eq!(validate_form_input(ok), Ok(()), "{ok}");
        }
    }

    #[test]
    fn test_empty_is_required() {
        assert_eq!(validate_form_input(""), Err(FormError::Required));
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        for bad in [
            "+0123456",
            "+1",
            "+1234567890123456",
            "+1 650 253 0000",
            "650-253-0000",
            "abc",
            " +16502530000",
        ] {
            assert_eq!(
                validate_form_input(bad),
                Err(FormError::NotInternational),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_validation_body() {
        let ok = FormValidation::from(validate_form_input("+16502530000"));
        assert!(ok.valid);
        assert_eq!(ok.message, None);

        let bad = FormValidation::from(validate_form_input(""));
        assert!(!bad.valid);
        assert_eq!(bad.message.as_deref(), Some("Phone number is required."));
    }
}
