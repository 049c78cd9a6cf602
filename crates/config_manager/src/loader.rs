//! Loading and validation of the configuration document.
//!
//! Loading runs in a fixed order: placeholder substitution on the raw text, YAML
//! parsing, schema validation, typed deserialization and finally the semantic checks
//! the schema cannot express (uniqueness, property search requirements).

use crate::configuration::{ActionSecret, Configuration, Element, Selection};
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::schema::validate_against_schema;
use crate::substitution::substitute_env_vars;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Default location of the configuration document, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".github/settings-sync.yml";

/// Loads the configuration document at `path`, resolving placeholders from the process
/// environment.
///
/// # Errors
///
/// Returns [`ConfigurationError::NotFound`] when the file does not exist, and the errors
/// of [`load_configuration_from_str`] for invalid content.
#[instrument]
pub fn load_configuration(path: &Path) -> ConfigurationResult<Configuration> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigurationError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigurationError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let config = load_configuration_from_str(&text, |name| std::env::var(name).ok())?;
    info!(
        path = %path.display(),
        elements = config.elements.len(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Parses and validates a configuration document held in memory.
///
/// `lookup` resolves `${NAME}` placeholders before the text is parsed.
///
/// # Errors
///
/// - [`ConfigurationError::Parse`] for malformed YAML or content serde rejects
/// - [`ConfigurationError::SchemaValidation`] for structural problems
/// - [`ConfigurationError::Invalid`] for semantic problems in an element
pub fn load_configuration_from_str<F>(text: &str, lookup: F) -> ConfigurationResult<Configuration>
where
    F: Fn(&str) -> Option<String>,
{
    let substituted = substitute_env_vars(text, lookup);

    let document: Value =
        serde_yaml::from_str(&substituted).map_err(|e| ConfigurationError::Parse {
            reason: e.to_string(),
        })?;

    validate_against_schema(&document)?;

    let config: Configuration =
        serde_json::from_value(document).map_err(|e| ConfigurationError::Parse {
            reason: e.to_string(),
        })?;

    validate_configuration(&config)?;

    debug!(elements = config.elements.len(), "Configuration validated");
    Ok(config)
}

/// Runs the semantic checks on every element.
pub fn validate_configuration(config: &Configuration) -> ConfigurationResult<()> {
    for element in &config.elements {
        validate_element(element)?;
    }
    Ok(())
}

fn validate_element(element: &Element) -> ConfigurationResult<()> {
    let invalid = |message: String| ConfigurationError::Invalid {
        element: element.display_name().to_string(),
        message,
    };

    if element.owner.trim().is_empty() {
        return Err(invalid("owner must not be empty".to_string()));
    }

    match element.selection() {
        Selection::Property { name, .. } => {
            if !element.org {
                return Err(invalid(
                    "searchType 'property' requires an organization owner (org: true)"
                        .to_string(),
                ));
            }
            if name.trim().is_empty() {
                return Err(invalid(
                    "searchType 'property' requires a non-empty customPropertyName".to_string(),
                ));
            }
        }
        Selection::All => {
            if element.custom_property_name.is_some() || element.custom_property_value.is_some()
            {
                return Err(invalid(
                    "customPropertyName and customPropertyValue require searchType 'property'"
                        .to_string(),
                ));
            }
        }
    }

    if let Some(rulesets) = &element.rulesets {
        ensure_unique("ruleset", rulesets.iter().map(|r| r.name.as_str())).map_err(invalid)?;
    }

    if let Some(environments) = &element.environments {
        ensure_unique("environment", environments.iter().map(|e| e.name.as_str()))
            .map_err(invalid)?;

        for environment in environments {
            if let Some(secrets) = &environment.secrets {
                ensure_unique_secrets(secrets)
                    .map_err(|m| invalid(format!("environment '{}': {}", environment.name, m)))?;
            }
            if let Some(rules) = &environment.protection_rules {
                ensure_unique("protection rule", rules.iter().map(|r| r.slug.as_str()))
                    .map_err(|m| invalid(format!("environment '{}': {}", environment.name, m)))?;
            }
        }
    }

    if let Some(secrets) = element.actions.as_ref().and_then(|a| a.secrets.as_ref()) {
        ensure_unique_secrets(secrets).map_err(invalid)?;
    }

    if let Some(files) = &element.files {
        ensure_unique(
            "file destination",
            files.files.iter().map(|f| f.destination.as_str()),
        )
        .map_err(invalid)?;
    }

    if let Some(merge_files) = &element.merge_files {
        ensure_unique(
            "merge file destination",
            merge_files.files.iter().map(|f| f.destination.as_str()),
        )
        .map_err(invalid)?;
    }

    Ok(())
}

fn ensure_unique_secrets(secrets: &[ActionSecret]) -> Result<(), String> {
    ensure_unique("secret", secrets.iter().map(|s| s.name.as_str()))
}

fn ensure_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(format!("duplicate {} '{}'", kind, name));
        }
    }
    Ok(())
}
