// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request input validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::error::AuthError;

// Common validation constants
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 32;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_TOKEN_LENGTH: usize = 512;

// Regex patterns for validation
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult = Result<(), ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(
            "Email must be between 1 and 254 characters".to_string(),
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Email format is not valid".to_string(),
        ));
    }
    Ok(())
}

/// Validate a username
pub fn validate_username(username: &str) -> ValidationResult {
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::InvalidUsername(
            "Username may contain only letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() || name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName(format!(
            "Name must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the shape of an opaque token before a store lookup
pub fn validate_token(token: &str) -> ValidationResult {
    if token.is_empty() || token.len() > MAX_TOKEN_LENGTH {
        return Err(ValidationError::InvalidToken(
            "Token must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@sub.domain.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al-ice_99").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has spaces").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Alice Liddell").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_token() {
        assert!(validate_token("sometoken").is_ok());
        assert!(validate_token("").is_err());
        assert!(validate_token(&"x".repeat(513)).is_err());
    }
}
