use github_client::{ActionsAccessPermissions, ActionsPermissions, RepositoryMetadata};
use tracing::debug;

use super::RuleContext;
use crate::errors::SyncResult;

pub(super) async fn apply_permissions(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    permissions: &ActionsPermissions,
) -> SyncResult<()> {
    ctx.client
        .update_actions_permissions(&repository.owner, &repository.name, permissions)
        .await?;
    debug!(enabled = permissions.enabled, "Actions permissions updated");
    Ok(())
}

pub(super) async fn apply_access(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    access: &ActionsAccessPermissions,
) -> SyncResult<()> {
    ctx.client
        .update_actions_access(&repository.owner, &repository.name, access)
        .await?;
    debug!(access_level = ?access.access_level, "Actions access updated");
    Ok(())
}
