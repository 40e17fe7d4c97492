//! Field validation for account signup and password changes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// One rejected field in a 422 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn validate_name(field: &str, value: &str) -> Option<FieldError> {
    let len = value.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Some(FieldError::new(
            field,
            format!("Must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"),
        ));
    }
    None
}

pub fn validate_email(value: &str) -> Option<FieldError> {
    if !EMAIL_RE.is_match(value) {
        return Some(FieldError::new("email", "Not a valid email address"));
    }
    None
}

pub fn validate_password(value: &str) -> Option<FieldError> {
    let len = value.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Some(FieldError::new(
            "password",
            format!("Must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"),
        ));
    }
    None
}

/// Collect every signup field error; email uniqueness is checked separately
/// against the database.
#[must_use]
pub fn validate_signup(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(e) = validate_name("first_name", first_name) {
        errors.push(e);
    }
    if let Some(e) = validate_name("last_name", last_name) {
        errors.push(e);
    }
    if let Some(e) = validate_email(email) {
        errors.push(e);
    }
    if let Some(e) = validate_password(password) {
        errors.push(e);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_bounds() {
        assert!(validate_name("first_name", "Bob").is_none());
        assert!(validate_name("first_name", &"a".repeat(20)).is_none());
        assert!(validate_name("first_name", "Al").is_some());
        assert!(validate_name("first_name", &"a".repeat(21)).is_some());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_none());
        assert!(validate_email("first.last+tag@sub.example.org").is_none());
        assert!(validate_email("not-an-email").is_some());
        assert!(validate_email("missing@tld").is_some());
        assert!(validate_email("@example.com").is_some());
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("12345678").is_none());
        assert!(validate_password(&"p".repeat(20)).is_none());
        assert!(validate_password("1234567").is_some());
        assert!(validate_password(&"p".repeat(21)).is_some());
    }

    #[test]
    fn test_validate_signup_collects_all() {
        let errors = validate_signup("A", "B", "bad", "short");
        assert_eq!(errors.len(), 4);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["first_name", "last_name", "email", "password"]);

        assert!(validate_signup("Alice", "Smith", "alice@example.com", "secret123").is_empty());
    }
}
