//! Configuration system error types.
//!
//! Domain-specific errors for loading, parsing and validating the settings
//! synchronization document. All of them are fatal: a run never starts with a
//! configuration that produced one of these errors.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration system errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read configuration file: {path} - {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("Configuration does not match the schema: {}", errors.join("; "))]
    SchemaValidation { errors: Vec<String> },

    #[error("Invalid configuration for element '{element}': {message}")]
    Invalid { element: String, message: String },
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
