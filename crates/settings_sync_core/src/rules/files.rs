//! File and merge-file synchronization.
//!
//! Both rules commit to one branch per element. A file is only written when its desired
//! content differs from the decoded remote content, and writes carry the last observed
//! blob sha so GitHub rejects them if the file changed in between.

use config_manager::{FileMapping, FilesOperation, MergeFile};
use github_client::{CommitOptions, RemoteFile, RepositoryMetadata};
use tracing::{debug, info};

use super::RuleContext;
use crate::content::FileContentResolver;
use crate::errors::{SyncError, SyncResult};
use crate::run_context::committer;

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;

/// A configured file entry of either kind.
#[derive(Debug, Clone, Copy)]
pub(super) enum FileEntry<'a> {
    Plain(&'a FileMapping),
    Merged(&'a MergeFile),
}

impl FileEntry<'_> {
    fn destination(&self) -> &str {
        match self {
            FileEntry::Plain(file) => &file.destination,
            FileEntry::Merged(file) => &file.destination,
        }
    }

    /// Desired bytes, or `None` when the destination should not exist.
    async fn desired_content(
        &self,
        resolver: &FileContentResolver,
        repository: &RepositoryMetadata,
    ) -> SyncResult<Option<Vec<u8>>> {
        match self {
            FileEntry::Plain(file) => resolver.resolve_file(file).await,
            FileEntry::Merged(file) => resolver.resolve_merge_file(file, repository).await,
        }
    }
}

pub(super) trait SyncedFile {
    fn entry(&self) -> FileEntry<'_>;
}

impl SyncedFile for FileMapping {
    fn entry(&self) -> FileEntry<'_> {
        FileEntry::Plain(self)
    }
}

impl SyncedFile for MergeFile {
    fn entry(&self) -> FileEntry<'_> {
        FileEntry::Merged(self)
    }
}

pub(super) async fn sync_files<T: SyncedFile>(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    operation: &FilesOperation<T>,
) -> SyncResult<()> {
    let (owner, repo) = (&repository.owner, &repository.name);

    let branch = operation
        .branch_name
        .as_deref()
        .or(repository.default_branch.as_deref())
        .ok_or_else(|| SyncError::BranchNotFound {
            branch: "<default>".to_string(),
            repository: repository.full_name.clone(),
        })?;

    let branches = ctx.client.list_branches(owner, repo).await?;
    if !branches.iter().any(|b| b.name == branch) {
        return Err(SyncError::BranchNotFound {
            branch: branch.to_string(),
            repository: repository.full_name.clone(),
        });
    }

    let overrides = operation.committer.as_ref();
    let identity = committer(
        overrides.and_then(|c| c.name.as_deref()),
        overrides.and_then(|c| c.email.as_deref()),
    );
    let git_ref = format!("refs/heads/{}", branch);

    for file in &operation.files {
        let entry = file.entry();
        let destination = entry.destination();
        info!(
            destination = destination,
            branch = branch,
            "Handling file '{}' on branch '{}'",
            destination,
            branch
        );

        let previous = previous_file(ctx, repository, destination, &git_ref).await?;

        match entry.desired_content(ctx.resolver, repository).await? {
            None => {
                let Some(previous) = previous else {
                    debug!("File does not exist on remote");
                    continue;
                };
                let options = CommitOptions {
                    message: ctx.run.removal_message(destination),
                    branch: branch.to_string(),
                    committer: identity.clone(),
                };
                let commit = ctx
                    .client
                    .delete_file(owner, repo, destination, &previous.sha, &options)
                    .await?;
                info!(
                    "Deleted file in commit {} : {}",
                    commit.sha.as_deref().unwrap_or_default(),
                    commit.html_url.as_deref().unwrap_or_default()
                );
            }
            Some(content) => {
                if previous.as_ref().is_some_and(|p| p.content == content) {
                    debug!("File is unchanged");
                    continue;
                }
                let options = CommitOptions {
                    message: ctx.run.sync_message(destination),
                    branch: branch.to_string(),
                    committer: identity.clone(),
                };
                let commit = ctx
                    .client
                    .put_file(
                        owner,
                        repo,
                        destination,
                        &content,
                        previous.as_ref().map(|p| p.sha.as_str()),
                        &options,
                    )
                    .await?;
                info!(
                    "Edited file in commit {} : {}",
                    commit.sha.as_deref().unwrap_or_default(),
                    commit.html_url.as_deref().unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

/// The remote file at `path`, or `None` when it does not exist yet.
async fn previous_file(
    ctx: RuleContext<'_>,
    repository: &RepositoryMetadata,
    path: &str,
    git_ref: &str,
) -> SyncResult<Option<RemoteFile>> {
    match ctx
        .client
        .get_file(&repository.owner, &repository.name, path, git_ref)
        .await
    {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}
