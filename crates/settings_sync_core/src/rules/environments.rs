//! Deployment environment rules.
//!
//! Environment entries may carry custom property conditions. An entry whose conditions
//! do not all match a repository is skipped by every rule of the family, before any
//! remote state is read.

use config_manager::EnvironmentDefinition;
use github_client::{
    BranchPolicyRequest, EnvironmentSettings, ProtectionRuleRequest, RepositoryMetadata,
};
use std::future::Future;
use tracing::{debug, info, warn};

use super::secrets::{sync_secrets, SecretScope};
use super::RuleContext;
use crate::errors::SyncResult;
use crate::property::matches_all;

#[cfg(test)]
#[path = "environments_tests.rs"]
mod tests;

/// Runs `apply` for each environment whose conditions match `repository`, in order.
pub(super) async fn for_each_eligible_environment<'a, F, Fut>(
    repository: &RepositoryMetadata,
    environments: &'a [EnvironmentDefinition],
    mut apply: F,
) -> SyncResult<()>
where
    F: FnMut(&'a EnvironmentDefinition) -> Fut,
    Fut: Future<Output = SyncResult<()>>,
{
    for environment in environments {
        if !matches_all(&repository.properties, &environment.conditions) {
            debug!(
                environment = %environment.name,
                "Environment conditions not met, skipping"
            );
            continue;
        }
        apply(environment).await?;
    }
    Ok(())
}

pub(super) async fn apply_environments(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    environments: &[EnvironmentDefinition],
) -> SyncResult<()> {
    for_each_eligible_environment(repository, environments, |environment| async move {
        info!(environment = %environment.name, "Handling environment '{}'", environment.name);

        let mut settings = environment.definition.clone();
        if repository.is_private_on_free_plan() {
            let dropped = strip_paid_settings(&mut settings);
            if !dropped.is_empty() {
                warn!(
                    environment = %environment.name,
                    dropped = ?dropped,
                    "Private repository {} is on the free plan; environment '{}' is applied without {}",
                    repository.full_name,
                    environment.name,
                    dropped.join(", ")
                );
            }
        }

        let result = ctx
            .client
            .create_or_update_environment(
                &repository.owner,
                &repository.name,
                &environment.name,
                &settings,
            )
            .await?;
        debug!(id = result.id, "Environment '{}' created or updated", result.name);
        Ok(())
    })
    .await
}

/// Removes the settings a free plan rejects on private repositories. Returns their names.
fn strip_paid_settings(settings: &mut EnvironmentSettings) -> Vec<&'static str> {
    let mut dropped = Vec::new();
    if settings.wait_timer.take().is_some() {
        dropped.push("wait_timer");
    }
    if settings.prevent_self_review.take().is_some() {
        dropped.push("prevent_self_review");
    }
    if settings.reviewers.take().is_some() {
        dropped.push("reviewers");
    }
    dropped
}

/// Enables desired protection rules that are not enabled yet and disables enabled rules
/// whose app is no longer desired. Disabled remote rules are ignored.
pub(super) async fn apply_protection_rules(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    environments: &[EnvironmentDefinition],
) -> SyncResult<()> {
    let (owner, repo) = (&repository.owner, &repository.name);

    for_each_eligible_environment(repository, environments, |environment| async move {
        let Some(desired) = &environment.protection_rules else {
            return Ok(());
        };
        info!(environment = %environment.name, "Handling environment '{}'", environment.name);

        let current = ctx
            .client
            .list_protection_rules(owner, repo, &environment.name)
            .await?;

        for rule in desired {
            if current.iter().any(|c| c.enabled && c.app.slug == rule.slug) {
                debug!("Protection rule '{}' already exists", rule.slug);
                continue;
            }
            debug!("Protection rule '{}' will be created", rule.slug);
            let request = ProtectionRuleRequest {
                integration_id: rule.integration_id,
            };
            let created = ctx
                .client
                .create_protection_rule(owner, repo, &environment.name, &request)
                .await?;
            debug!(id = created.id, "Protection rule created");
        }

        for rule in current.iter().filter(|c| c.enabled) {
            if desired.iter().any(|d| d.slug == rule.app.slug) {
                continue;
            }
            debug!("Protection rule '{}' will be disabled", rule.app.slug);
            ctx.client
                .disable_protection_rule(owner, repo, &environment.name, rule.id)
                .await?;
        }

        Ok(())
    })
    .await
}

/// Makes the remote branch policies exactly the desired set, matched by name.
pub(super) async fn apply_branch_policies(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    environments: &[EnvironmentDefinition],
) -> SyncResult<()> {
    let (owner, repo) = (&repository.owner, &repository.name);

    for_each_eligible_environment(repository, environments, |environment| async move {
        if !environment.definition.uses_custom_branch_policies() {
            info!(
                "Skipped applying rules, custom branch policies are disabled in environment '{}'",
                environment.name
            );
            return Ok(());
        }
        let Some(desired) = &environment.branch_policies else {
            info!(
                "Skipped applying rules, no branch policies defined in environment '{}'",
                environment.name
            );
            return Ok(());
        };
        info!(environment = %environment.name, "Handling environment '{}'", environment.name);

        let current: Vec<(u64, String)> = ctx
            .client
            .list_branch_policies(owner, repo, &environment.name)
            .await?
            .into_iter()
            .filter_map(|policy| Some((policy.id?, policy.name?)))
            .collect();

        for policy in desired {
            if current.iter().any(|(_, name)| name == &policy.name) {
                debug!("Branch policy '{}' already exists", policy.name);
                continue;
            }
            create_branch_policy(ctx, repository, &environment.name, policy).await?;
        }

        for (id, name) in &current {
            if desired.iter().any(|d| &d.name == name) {
                continue;
            }
            debug!("Branch policy '{}' will be deleted", name);
            ctx.client
                .delete_branch_policy(owner, repo, &environment.name, *id)
                .await?;
        }

        Ok(())
    })
    .await
}

async fn create_branch_policy(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    environment: &str,
    policy: &BranchPolicyRequest,
) -> SyncResult<()> {
    debug!("Branch policy '{}' will be created", policy.name);
    let created = ctx
        .client
        .create_branch_policy(&repository.owner, &repository.name, environment, policy)
        .await?;
    debug!(id = ?created.id, "Branch policy created");
    Ok(())
}

pub(super) async fn apply_environment_secrets(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    environments: &[EnvironmentDefinition],
) -> SyncResult<()> {
    for_each_eligible_environment(repository, environments, |environment| async move {
        let Some(secrets) = &environment.secrets else {
            return Ok(());
        };
        info!(environment = %environment.name, "Handling environment '{}'", environment.name);
        sync_secrets(
            ctx,
            repository,
            SecretScope::Environment(&environment.name),
            secrets,
        )
        .await
    })
    .await
}

pub(super) async fn delete_environments(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    names: &[String],
) -> SyncResult<()> {
    let current = ctx
        .client
        .list_environments(&repository.owner, &repository.name)
        .await?;

    for name in names {
        info!(environment = %name, "Handling environment '{}'", name);

        if !current.iter().any(|e| &e.name == name) {
            warn!(
                "Environment '{}' does not exist on {}",
                name, repository.full_name
            );
            continue;
        }

        ctx.client
            .delete_environment(&repository.owner, &repository.name, name)
            .await?;
        debug!("Environment '{}' deleted", name);
    }

    Ok(())
}
