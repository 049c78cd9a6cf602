//! GitHub custom property value types.
//!
//! Custom properties are organization-defined tags attached to repositories. A value is
//! either a single string, a list of strings (multi-select properties) or null.
//!
//! See: https://docs.github.com/en/rest/repos/custom-properties

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "custom_property_tests.rs"]
mod tests;

/// Value of a custom property assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomPropertyValue {
    /// Single string value (string, single select, true/false properties)
    Single(String),
    /// List of values (multi select properties)
    Multiple(Vec<String>),
}

impl CustomPropertyValue {
    /// Returns true if the value equals `expected`, or contains it for list values.
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            CustomPropertyValue::Single(value) => value == expected,
            CustomPropertyValue::Multiple(values) => values.iter().any(|v| v == expected),
        }
    }
}

/// A custom property assignment as returned by
/// `GET /repos/{owner}/{repo}/properties/values`.
///
/// # Examples
///
/// ```
/// use github_client::{CustomPropertyAssignment, CustomPropertyValue};
///
/// let assignment: CustomPropertyAssignment = serde_json::from_str(
///     r#"{"property_name": "environment", "value": ["prod", "staging"]}"#,
/// ).unwrap();
///
/// assert_eq!(
///     assignment.value,
///     Some(CustomPropertyValue::Multiple(vec!["prod".into(), "staging".into()]))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPropertyAssignment {
    /// Name of the property definition
    pub property_name: String,

    /// Assigned value, `None` when the property is explicitly unset
    #[serde(default)]
    pub value: Option<CustomPropertyValue>,
}
