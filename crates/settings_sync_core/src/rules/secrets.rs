//! Write-only secret reconciliation shared by repository and environment secrets.
//!
//! GitHub never returns secret values, so a secret with a value is always re-sealed and
//! written. A secret without a value is deleted when it exists.

use config_manager::ActionSecret;
use github_client::{PublicKey, RepositoryMetadata, SecretSummary};
use tracing::{debug, info};

use super::RuleContext;
use crate::cipher::encrypt_secret;
use crate::errors::SyncResult;

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SecretScope<'a> {
    Repository,
    Environment(&'a str),
}

impl SecretScope<'_> {
    async fn public_key(
        self,
        ctx: RuleContext<'_>,
        repository: &RepositoryMetadata,
    ) -> SyncResult<PublicKey> {
        let (owner, repo) = (&repository.owner, &repository.name);
        let key = match self {
            SecretScope::Repository => ctx.client.get_repository_public_key(owner, repo).await?,
            SecretScope::Environment(environment) => {
                ctx.client
                    .get_environment_public_key(owner, repo, environment)
                    .await?
            }
        };
        Ok(key)
    }

    async fn list(
        self,
        ctx: RuleContext<'_>,
        repository: &RepositoryMetadata,
    ) -> SyncResult<Vec<SecretSummary>> {
        let (owner, repo) = (&repository.owner, &repository.name);
        let secrets = match self {
            SecretScope::Repository => ctx.client.list_repository_secrets(owner, repo).await?,
            SecretScope::Environment(environment) => {
                ctx.client
                    .list_environment_secrets(owner, repo, environment)
                    .await?
            }
        };
        Ok(secrets)
    }
}

pub(super) async fn sync_secrets(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    scope: SecretScope<'_>,
    secrets: &[ActionSecret],
) -> SyncResult<()> {
    let (owner, repo) = (&repository.owner, &repository.name);

    debug!(scope = ?scope, "Getting public key");
    let key = scope.public_key(ctx, repository).await?;
    let current = scope.list(ctx, repository).await?;

    for secret in secrets {
        info!(secret = %secret.name, "Handling secret '{}'", secret.name);
        let exists = current.iter().any(|s| s.name == secret.name);

        match (&secret.value, scope) {
            (None, _) if !exists => {
                debug!("Secret '{}' does not exist", secret.name);
            }
            (None, SecretScope::Repository) => {
                debug!("Secret '{}' will be deleted", secret.name);
                ctx.client
                    .delete_repository_secret(owner, repo, &secret.name)
                    .await?;
            }
            (None, SecretScope::Environment(environment)) => {
                debug!("Secret '{}' will be deleted", secret.name);
                ctx.client
                    .delete_environment_secret(owner, repo, environment, &secret.name)
                    .await?;
            }
            (Some(value), SecretScope::Repository) => {
                debug!("Secret '{}' will be created or updated", secret.name);
                let encrypted = encrypt_secret(&key, &secret.name, value)?;
                ctx.client
                    .put_repository_secret(owner, repo, &secret.name, &encrypted)
                    .await?;
            }
            (Some(value), SecretScope::Environment(environment)) => {
                debug!("Secret '{}' will be created or updated", secret.name);
                let encrypted = encrypt_secret(&key, &secret.name, value)?;
                ctx.client
                    .put_environment_secret(owner, repo, environment, &secret.name, &encrypted)
                    .await?;
            }
        }
    }

    Ok(())
}
