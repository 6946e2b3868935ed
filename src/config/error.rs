//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating [`BatchConfig`](super::BatchConfig)
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load configuration from {source_name}: {message}")]
    Load {
        source_name: String,
        message: String,
    },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigurationError {
    pub fn load_error(source_name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Load {
            source_name: source_name.into(),
            message: error.to_string(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
