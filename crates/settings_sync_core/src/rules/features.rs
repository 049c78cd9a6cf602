use github_client::{RepositoryFeatures, RepositoryMetadata};
use tracing::debug;

use super::RuleContext;
use crate::errors::SyncResult;

pub(super) async fn apply_features(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    features: &RepositoryFeatures,
) -> SyncResult<()> {
    ctx.client
        .update_repository_features(&repository.owner, &repository.name, features)
        .await?;
    debug!(repository = %repository.full_name, "Repository features updated");
    Ok(())
}
