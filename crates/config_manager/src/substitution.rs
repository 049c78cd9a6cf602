//! `${NAME}` placeholder substitution applied to the raw configuration text.

use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::{info, warn};

#[cfg(test)]
#[path = "substitution_tests.rs"]
mod tests;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// Replaces every `${NAME}` placeholder in `text` with the value returned by `lookup`.
///
/// Placeholders whose variable is unknown are left untouched and reported with a warning.
/// Substitution is a single pass: values are never rescanned for placeholders.
pub fn substitute_env_vars<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    placeholder_pattern()
        .replace_all(text, |captures: &Captures<'_>| {
            let name = &captures[1];
            match lookup(name) {
                Some(value) => {
                    info!(variable = name, "Replacing Environment Variable {}", name);
                    value
                }
                None => {
                    warn!(variable = name, "Environment Variable {} not found", name);
                    captures[0].to_string()
                }
            }
        })
        .into_owned()
}
