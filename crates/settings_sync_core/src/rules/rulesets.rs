//! Ruleset reconciliation.
//!
//! Rulesets are matched by name. Applying is additive: existing rulesets are updated in
//! place and missing ones created, but nothing is deleted unless it is named in the
//! deletion list.

use github_client::{RepositoryMetadata, RepositoryRuleset};
use tracing::{debug, info, warn};

use super::RuleContext;
use crate::errors::SyncResult;

#[cfg(test)]
#[path = "rulesets_tests.rs"]
mod tests;

pub(super) async fn apply_rulesets(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    rulesets: &[RepositoryRuleset],
) -> SyncResult<()> {
    let mut current = ctx
        .client
        .list_rulesets(&repository.owner, &repository.name)
        .await?;

    for ruleset in rulesets {
        info!(ruleset = %ruleset.name, "Handling ruleset '{}'", ruleset.name);

        let existing = current.iter().find(|r| r.name == ruleset.name).map(|r| r.id);
        match existing {
            Some(id) => {
                debug!(id = id, "Ruleset '{}' will be updated", ruleset.name);
                ctx.client
                    .update_ruleset(&repository.owner, &repository.name, id, ruleset)
                    .await?;
            }
            None => {
                debug!("Ruleset '{}' will be created", ruleset.name);
                let created = ctx
                    .client
                    .create_ruleset(&repository.owner, &repository.name, ruleset)
                    .await?;
                debug!(id = created.id, "Ruleset created");
                current.push(created);
            }
        }
    }

    Ok(())
}

pub(super) async fn delete_rulesets(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    names: &[String],
) -> SyncResult<()> {
    let current = ctx
        .client
        .list_rulesets(&repository.owner, &repository.name)
        .await?;

    for name in names {
        info!(ruleset = %name, "Handling ruleset '{}'", name);

        let Some(existing) = current.iter().find(|r| &r.name == name) else {
            warn!(
                "Ruleset '{}' does not exist on {}",
                name, repository.full_name
            );
            continue;
        };

        ctx.client
            .delete_ruleset(&repository.owner, &repository.name, existing.id)
            .await?;
        debug!(id = existing.id, "Ruleset deleted");
    }

    Ok(())
}
