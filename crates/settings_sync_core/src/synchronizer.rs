//! Run orchestration: elements, then repositories, then rules, strictly in sequence.

use config_manager::{Configuration, Element};
use github_client::{RepositoryClient, RepositoryMetadata};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::content::FileContentResolver;
use crate::errors::{SyncError, SyncResult};
use crate::report::{StepOutcome, SyncReport};
use crate::rules::{Rule, RuleContext};
use crate::run_context::RunContext;
use crate::selector::select_repositories;

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;

/// Applies a configuration to every selected repository.
///
/// A failing rule is logged and counted, and the run moves on to the next rule. Only a
/// failure to list an owner's repositories ends the run early.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_sync_core::{FileContentResolver, RunContext, SettingsSynchronizer};
/// use std::sync::Arc;
///
/// # async fn example(
/// #     client: github_client::GitHubClient,
/// #     configuration: config_manager::Configuration,
/// # ) -> Result<(), settings_sync_core::SyncError> {
/// let synchronizer = SettingsSynchronizer::new(
///     Arc::new(client),
///     FileContentResolver::new("."),
///     RunContext::from_env(),
/// );
/// let report = synchronizer.run(&configuration).await?;
/// println!("{} steps applied, {} failed", report.applied, report.failed);
/// # Ok(())
/// # }
/// ```
pub struct SettingsSynchronizer {
    client: Arc<dyn RepositoryClient>,
    resolver: FileContentResolver,
    run_context: RunContext,
}

impl SettingsSynchronizer {
    pub fn new(
        client: Arc<dyn RepositoryClient>,
        resolver: FileContentResolver,
        run_context: RunContext,
    ) -> Self {
        Self {
            client,
            resolver,
            run_context,
        }
    }

    /// Runs every element of `configuration` in order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RepositoryListing`] when the repositories of an element's owner
    /// cannot be listed. Elements after it are not processed.
    #[instrument(skip_all, fields(elements = configuration.elements.len()))]
    pub async fn run(&self, configuration: &Configuration) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();

        for (index, element) in configuration.elements.iter().enumerate() {
            info!(
                element = element.display_name(),
                "Processing element {}",
                index + 1
            );
            self.process_element(element, &mut report).await?;
            report.elements += 1;
        }

        info!(
            elements = report.elements,
            repositories = report.repositories,
            applied = report.applied,
            ineligible = report.ineligible,
            failed = report.failed,
            "Synchronization complete"
        );
        Ok(report)
    }

    async fn process_element(&self, element: &Element, report: &mut SyncReport) -> SyncResult<()> {
        info!(owner = %element.owner, org = element.org, "Listing repositories");
        let listing = self
            .client
            .list_repositories(&element.owner, element.org)
            .await
            .map_err(|source| SyncError::RepositoryListing {
                owner: element.owner.clone(),
                source,
            })?;

        let repositories = select_repositories(listing, element);
        info!("Found {} repositories", repositories.len());

        for repository in &repositories {
            self.apply_element(element, repository, report).await;
        }
        Ok(())
    }

    #[instrument(skip_all, fields(repository = %repository.full_name))]
    async fn apply_element(
        &self,
        element: &Element,
        repository: &RepositoryMetadata,
        report: &mut SyncReport,
    ) {
        info!(
            "Repository url : {}",
            repository.html_url.as_deref().unwrap_or_default()
        );
        info!("Repository visibility : {}", repository.visibility);

        for rule in Rule::ALL {
            let outcome = self.run_step(rule, element, repository).await;
            report.record(&repository.full_name, rule.name(), outcome);
        }
        report.repositories += 1;
    }

    async fn run_step(
        &self,
        rule: Rule,
        element: &Element,
        repository: &RepositoryMetadata,
    ) -> StepOutcome {
        let name = rule.name();
        info!(rule = name, "Starting step '{}'...", name);

        let Some(desired) = rule.extract(element) else {
            info!(rule = name, "Nothing to do");
            return StepOutcome::NotConfigured;
        };

        if let Some(reason) = rule.ineligibility(repository) {
            warn!(
                rule = name,
                "Cannot apply {} on repository {} : {}",
                name,
                repository.full_name,
                reason
            );
            return StepOutcome::Ineligible(reason);
        }

        let ctx = RuleContext {
            client: self.client.as_ref(),
            resolver: &self.resolver,
            run: &self.run_context,
        };
        match desired.apply(ctx, repository).await {
            Ok(()) => {
                info!(rule = name, "Step '{}' finished successfully", name);
                StepOutcome::Applied
            }
            Err(e) => {
                error!(
                    rule = name,
                    error = %e,
                    detail = ?e,
                    "Step '{}' finished with an error",
                    name
                );
                StepOutcome::Failed(e.to_string())
            }
        }
    }
}
