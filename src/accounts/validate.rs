use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MIN_PASSWORD_LENGTH: usize = 6;
const DEFAULT_NAME: &str = "Anonymous";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Missing name falls back to the default; an explicitly empty one is rejected.
pub fn validate_name(name: Option<&str>) -> Result<String, ValidationError> {
    match name {
        None => Ok(DEFAULT_NAME.to_string()),
        Some(n) if n.trim().is_empty() => Err(ValidationError::new("name", "must not be empty")),
        Some(n) => Ok(n.trim().to_string()),
    }
}

pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::new("email", "is required"));
    }
    if !is_valid_email(&email) {
        return Err(ValidationError::new("email", "is not a valid address"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    if password.to_lowercase().contains("password") {
        return Err(ValidationError::new(
            "password",
            "must not contain \"password\"",
        ));
    }
    Ok(())
}

pub fn validate_age(age: Option<i32>) -> Result<Option<i32>, ValidationError> {
    match age {
        Some(a) if a < 0 => Err(ValidationError::new("age", "must not be negative")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_defaults_to_anonymous() {
        assert_eq!(validate_name(None).unwrap(), "Anonymous");
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = validate_name(Some("  ")).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(validate_email("  A@B.com ").unwrap(), "a@b.com");
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["", "no-at-sign", "a@b", "a b@c.com"] {
            let err = validate_email(bad).unwrap_err();
            assert_eq!(err.field, "email");
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_password("abc12").unwrap_err();
        assert_eq!(err.field, "password");
    }

    #[test]
    fn password_containing_password_is_rejected_case_insensitively() {
        for bad in ["password1", "myPASSWORDiscool", "PaSsWoRd!!"] {
            let err = validate_password(bad).unwrap_err();
            assert_eq!(err.field, "password");
        }
    }

    #[test]
    fn reasonable_password_passes() {
        assert!(validate_password("secret1").is_ok());
    }

    #[test]
    fn negative_age_is_rejected() {
        let err = validate_age(Some(-1)).unwrap_err();
        assert_eq!(err.field, "age");
        assert_eq!(validate_age(Some(0)).unwrap(), Some(0));
        assert_eq!(validate_age(None).unwrap(), None);
    }
}
