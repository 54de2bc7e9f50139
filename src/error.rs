//! Error types for configuration loading, settings and export.
//!
//! The estimators themselves are total and never produce these.

use thiserror::Error;

/// Result alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.num_batteries"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One or more validation failures, reported together.
    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<ConfigError>),

    #[error("settings error: {key} - {message}")]
    Settings { key: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
