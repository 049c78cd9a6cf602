//! Repository selection for a configuration element.

use config_manager::{Element, Selection};
use github_client::RepositoryMetadata;
use tracing::debug;

use crate::property::has_property;

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;

/// Filters an owner's repository listing down to the repositories `element` applies to.
///
/// Property selection keeps matching repositories, excluded full names are dropped and
/// archived repositories are always dropped. Listing order is preserved.
pub fn select_repositories(
    listing: Vec<RepositoryMetadata>,
    element: &Element,
) -> Vec<RepositoryMetadata> {
    let selection = element.selection();
    listing
        .into_iter()
        .filter(|repository| match selection {
            Selection::All => true,
            Selection::Property { name, value } => {
                has_property(&repository.properties, name, value)
            }
        })
        .filter(|repository| {
            let excluded = element.exclude.contains(&repository.full_name);
            if excluded {
                debug!(repository = %repository.full_name, "Repository excluded");
            }
            !excluded
        })
        .filter(|repository| !repository.archived)
        .collect()
}
