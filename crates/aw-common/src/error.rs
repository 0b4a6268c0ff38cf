//! Error types shared across AdventureWorks crates

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, AwError>;

/// Failures that are not tied to a single HTTP request
#[derive(Error, Debug)]
pub enum AwError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl AwError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message() {
        let err = AwError::invalid_value("AW_PORT", "must be a number");
        assert_eq!(err.to_string(), "Invalid value for AW_PORT: must be a number");
    }

    #[test]
    fn test_config_message() {
        assert_eq!(
            AwError::config("JWT_SECRET is too short").to_string(),
            "Configuration error: JWT_SECRET is too short"
        );
    }
}
