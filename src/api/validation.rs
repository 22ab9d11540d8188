//! Input validation for API requests.
//!
//! Validators return `Result<(), String>`; handlers collect failures with the
//! `ValidationErrorBuilder` from the `error` module and reply with a single
//! 400 carrying field-level detail.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Simple local@domain.tld shape. Intentionally loose: the portal's job
    /// is to catch typos, not to implement RFC 5321.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a password at registration time
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        ));
    }

    Ok(())
}

/// Validate a person's or organisation's display name
pub fn validate_name(name: &str, field: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if name.len() > 255 {
        return Err(format!("{} is too long (max 255 characters)", field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("john.smith+guest@sub.example.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("").is_err());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("secret1").is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Jane Doe", "Full name").is_ok());
        assert!(validate_name("", "Full name").is_err());
        assert!(validate_name("   ", "Full name").is_err());
        assert!(validate_name(&"x".repeat(256), "Full name").is_err());
    }

    #[test]
    fn test_name_error_mentions_field() {
        let err = validate_name("", "Organisation name").unwrap_err();
        assert!(err.contains("Organisation name"));
    }
}
