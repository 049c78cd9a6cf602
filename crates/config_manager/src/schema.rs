//! JSON Schema for the configuration document.
//!
//! The schema is generated from the [`Configuration`] types with `schemars`, so it never
//! drifts from what the loader accepts. It is used to validate documents before they are
//! deserialized, which yields every structural problem at once instead of only the first
//! one serde would report. The CLI also prints it for editor integration.

use crate::configuration::Configuration;
use crate::errors::{ConfigurationError, ConfigurationResult};
use schemars::schema_for;
use serde_json::Value;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Generates the JSON Schema describing a configuration document.
pub fn configuration_schema() -> Value {
    schema_for!(Configuration).to_value()
}

/// Validates a parsed document against [`configuration_schema`].
///
/// # Errors
///
/// Returns [`ConfigurationError::SchemaValidation`] listing every violation found.
pub fn validate_against_schema(document: &Value) -> ConfigurationResult<()> {
    let schema = configuration_schema();
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| ConfigurationError::Parse {
            reason: format!("Failed to compile configuration schema: {}", e),
        })?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::SchemaValidation { errors })
    }
}
