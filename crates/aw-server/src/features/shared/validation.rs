//! Shared validation utilities
//!
//! Field-level checks used by every command's `validate()`. The bounds mirror
//! the CHECK constraints in `migrations/`, so a request that passes here is
//! only rejected by the database for referential or uniqueness reasons.
//!
//! # Examples
//!
//! ```rust,ignore
//! use aw_server::features::shared::validation::{validate_required_text, validate_range};
//!
//! validate_required_text(&command.name, "name", 50)?;
//! validate_range(command.vacation_hours, "vacation_hours", -40, 240)?;
//! ```

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::fmt::Display;
use thiserror::Error;

/// A single field failed validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("{field} must be one of: {allowed}")]
    NotAllowed { field: &'static str, allowed: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,
}

impl FieldError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Non-blank text no longer than `max_length` characters
pub fn validate_required_text(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required { field });
    }
    validate_length(value, field, max_length)
}

/// Like [`validate_required_text`] but `None` is accepted
pub fn validate_optional_text(
    value: Option<&str>,
    field: &'static str,
    max_length: usize,
) -> Result<(), FieldError> {
    match value {
        Some(value) => validate_length(value, field, max_length),
        None => Ok(()),
    }
}

fn validate_length(value: &str, field: &'static str, max_length: usize) -> Result<(), FieldError> {
    if value.chars().count() > max_length {
        return Err(FieldError::TooLong { field, max_length });
    }
    Ok(())
}

/// Value must be one of a fixed set of codes (e.g. gender `M`/`F`)
pub fn validate_code(value: &str, field: &'static str, allowed: &[&str]) -> Result<(), FieldError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(FieldError::NotAllowed {
            field,
            allowed: allowed.join(", "),
        })
    }
}

/// Inclusive range check
pub fn validate_range<T>(value: T, field: &'static str, min: T, max: T) -> Result<(), FieldError>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(FieldError::OutOfRange {
            field,
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Inclusive date range check
pub fn validate_date_range(
    value: NaiveDate,
    field: &'static str,
    min: NaiveDate,
    max: NaiveDate,
) -> Result<(), FieldError> {
    validate_range(value, field, min, max)
}

/// Monetary amount that must not be negative
pub fn validate_non_negative(value: &BigDecimal, field: &'static str) -> Result<(), FieldError> {
    if *value < BigDecimal::from(0) {
        return Err(FieldError::invalid(field, "must not be negative"));
    }
    Ok(())
}

/// Minimal structural email check: `local@domain.tld`, no whitespace
pub fn validate_email(value: &str, field: &'static str) -> Result<(), FieldError> {
    validate_required_text(value, field, 50)?;

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        },
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail { field })
    }
}

/// Phone numbers: digits plus the usual separators, 25 characters max
pub fn validate_phone(value: &str, field: &'static str) -> Result<(), FieldError> {
    validate_required_text(value, field, 25)?;
    let allowed = |c: char| c.is_ascii_digit() || " +-().x".contains(c);
    if !value.chars().all(allowed) || !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(FieldError::invalid(field, "may only contain digits, spaces and + - ( ) . x"));
    }
    Ok(())
}
