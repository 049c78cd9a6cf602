//! Custom property predicate shared by repository selection, environment conditions and
//! merge-file sources.

use config_manager::PropertyCondition;
use github_client::CustomPropertyAssignment;

#[cfg(test)]
#[path = "property_tests.rs"]
mod tests;

/// Returns true when `properties` satisfy the `(name, value)` condition.
///
/// Without an expected value the predicate always matches, whether or not the property
/// is assigned. With a value, a property of the same name must equal it, or contain it
/// when multi-valued. A property explicitly set to null never matches a value.
pub fn has_property(
    properties: &[CustomPropertyAssignment],
    name: &str,
    expected: Option<&str>,
) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    properties
        .iter()
        .filter(|p| p.property_name == name)
        .any(|p| p.value.as_ref().is_some_and(|v| v.matches(expected)))
}

/// [`has_property`] for a configured condition.
pub fn matches_condition(
    properties: &[CustomPropertyAssignment],
    condition: &PropertyCondition,
) -> bool {
    has_property(
        properties,
        &condition.custom_property_name,
        condition.custom_property_value.as_deref(),
    )
}

/// True when every condition matches. An empty list matches.
pub fn matches_all(properties: &[CustomPropertyAssignment], conditions: &[PropertyCondition]) -> bool {
    conditions.iter().all(|c| matches_condition(properties, c))
}
