//! Local input validation.
//!
//! Everything here runs before a request is built. A validation failure blocks
//! submission and never reaches the network layer.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Minimum password length accepted by the identity provider.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{field} must be at least {min}")]
    TooSmall { field: &'static str, min: u32 },

    #[error("{0}")]
    Invalid(String),
}

/// Trims `value` and fails if nothing is left.
pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed)
}

/// Validates and normalizes an email address (trimmed, lowercased).
pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let trimmed = require_non_empty("email", value)?;
    if !EMAIL_PATTERN.is_match(trimmed) {
        return Err(ValidationError::InvalidEmail {
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_lowercase())
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn require_at_least(field: &'static str, value: u32, min: u32) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::TooSmall { field, min });
    }
    Ok(())
}
