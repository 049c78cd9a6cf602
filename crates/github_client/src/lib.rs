//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides the [`RepositoryClient`] trait, which covers every read and write
//! the settings synchronizer performs against a repository, and [`GitHubClient`], its
//! implementation on top of an authenticated [`Octocrab`] instance.
//!
//! Clients are built either from a personal access token ([`create_token_client`]) or
//! as a GitHub App ([`create_app_client`] followed by [`authenticate_with_access_token`]).

use async_trait::async_trait;
use base64::Engine as _;
use http::StatusCode;
use jsonwebtoken::EncodingKey;
use octocrab::{Octocrab, Result as OctocrabResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, instrument};
use url::Url;

pub mod actions;
pub use actions::{
    AccessLevel, ActionsAccessPermissions, ActionsPermissions, AllowedActions, EncryptedSecret,
    PublicKey, SecretSummary,
};

pub mod contents;
pub use contents::{Branch, CommitInfo, CommitOptions, Committer, EntryType, RemoteFile};

pub mod custom_property;
pub use custom_property::{CustomPropertyAssignment, CustomPropertyValue};

pub mod environment;
pub use environment::{
    BranchPolicy, BranchPolicyRequest, BranchPolicyType, DeploymentBranchPolicy,
    DeploymentProtectionRule, EnvironmentReviewer, EnvironmentSettings, EnvironmentSummary,
    ProtectionRuleApp, ProtectionRuleRequest, ReviewerType,
};

pub mod errors;
pub use errors::Error;

pub mod repository;
pub use repository::{
    MergeCommitMessage, MergeCommitTitle, RepositoryFeatures, RepositoryMetadata,
    SquashMergeCommitMessage, SquashMergeCommitTitle, Visibility, FREE_PLAN,
};

pub mod ruleset;
pub use ruleset::{
    BypassActor, BypassActorType, BypassMode, RefNameCondition, RepositoryRuleset, Rule,
    RulesetConditions, RulesetEnforcement, RulesetSummary, RulesetTarget,
};

use contents::{
    BlobResponse, ContentResponse, FileCommitResponse, FileDeleteRequest, FileWriteRequest,
};
use environment::{BranchPolicyList, DeploymentProtectionRuleList, EnvironmentList};
use repository::{AccountDetails, RepositoryListing};
use actions::SecretList;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Page size used for every paginated listing.
const PER_PAGE: u8 = 100;

/// Trait for every repository operation the synchronizer performs.
///
/// Methods that read a single resource return [`Error::NotFound`] when GitHub answers
/// with a 404, so callers can treat absence as state rather than failure.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Lists every repository of a user or organization, sorted by full name.
    ///
    /// The returned metadata includes the plan of the owning account and, for
    /// organization-owned repositories, the custom property values.
    async fn list_repositories(
        &self,
        owner: &str,
        is_org: bool,
    ) -> Result<Vec<RepositoryMetadata>, Error>;

    /// Updates repository settings. Only the fields set in `features` are changed.
    async fn update_repository_features(
        &self,
        owner: &str,
        repo: &str,
        features: &RepositoryFeatures,
    ) -> Result<(), Error>;

    async fn list_rulesets(&self, owner: &str, repo: &str) -> Result<Vec<RulesetSummary>, Error>;

    async fn create_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset: &RepositoryRuleset,
    ) -> Result<RulesetSummary, Error>;

    async fn update_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset_id: u64,
        ruleset: &RepositoryRuleset,
    ) -> Result<RulesetSummary, Error>;

    async fn delete_ruleset(&self, owner: &str, repo: &str, ruleset_id: u64) -> Result<(), Error>;

    async fn list_environments(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<EnvironmentSummary>, Error>;

    /// Creates the environment, or replaces the settings of an existing one.
    async fn create_or_update_environment(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        settings: &EnvironmentSettings,
    ) -> Result<EnvironmentSummary, Error>;

    async fn delete_environment(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<(), Error>;

    async fn list_protection_rules(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<DeploymentProtectionRule>, Error>;

    async fn create_protection_rule(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        request: &ProtectionRuleRequest,
    ) -> Result<DeploymentProtectionRule, Error>;

    /// Disables a custom deployment protection rule on an environment.
    async fn disable_protection_rule(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        rule_id: u64,
    ) -> Result<(), Error>;

    async fn list_branch_policies(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<BranchPolicy>, Error>;

    async fn create_branch_policy(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        request: &BranchPolicyRequest,
    ) -> Result<BranchPolicy, Error>;

    async fn delete_branch_policy(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        policy_id: u64,
    ) -> Result<(), Error>;

    async fn get_repository_public_key(&self, owner: &str, repo: &str)
        -> Result<PublicKey, Error>;

    async fn list_repository_secrets(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<SecretSummary>, Error>;

    async fn put_repository_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), Error>;

    async fn delete_repository_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<(), Error>;

    async fn get_environment_public_key(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<PublicKey, Error>;

    async fn list_environment_secrets(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<SecretSummary>, Error>;

    async fn put_environment_secret(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        name: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), Error>;

    async fn delete_environment_secret(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        name: &str,
    ) -> Result<(), Error>;

    async fn update_actions_permissions(
        &self,
        owner: &str,
        repo: &str,
        permissions: &ActionsPermissions,
    ) -> Result<(), Error>;

    async fn update_actions_access(
        &self,
        owner: &str,
        repo: &str,
        access: &ActionsAccessPermissions,
    ) -> Result<(), Error>;

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error>;

    /// Reads a file at `git_ref`.
    ///
    /// Files too large to be inlined in the contents response are read from their blob.
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - No file exists at `path` on that ref
    /// * `Error::UnexpectedContentType` - `path` is a directory, symlink or submodule
    /// * `Error::UnsupportedEncoding` - the content cannot be decoded
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, Error>;

    /// Creates or updates a file.
    ///
    /// `sha` must be the blob SHA of the current file when it exists. GitHub rejects the
    /// write if the file changed since it was read.
    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        sha: Option<&str>,
        options: &CommitOptions,
    ) -> Result<CommitInfo, Error>;

    /// Deletes a file. `sha` is the blob SHA of the content being removed.
    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        options: &CommitOptions,
    ) -> Result<CommitInfo, Error>;
}

/// A client for interacting with the GitHub API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

#[derive(Debug, Serialize)]
struct PageQuery<'a> {
    per_page: u8,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    includes_parents: Option<bool>,
}

#[derive(Debug, Serialize)]
struct RefQuery<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

impl GitHubClient {
    /// Wraps an authenticated `Octocrab` instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Fetches every page of a listing endpoint.
    ///
    /// `items` extracts the entries from one page; pages are requested until one comes
    /// back with fewer than [`PER_PAGE`] entries.
    async fn get_pages<R, T>(
        &self,
        path: &str,
        sort: Option<&str>,
        includes_parents: Option<bool>,
        items: fn(R) -> Vec<T>,
    ) -> Result<Vec<T>, Error>
    where
        R: DeserializeOwned,
    {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let query = PageQuery {
                per_page: PER_PAGE,
                page,
                sort,
                includes_parents,
            };
            let response: OctocrabResult<R> = self.client.get(path, Some(&query)).await;
            let entries = items(response.map_err(|e| convert_error("Failed to list", e))?);

            let count = entries.len();
            all.extend(entries);
            debug!(path = path, page = page, count = count, "Fetched page");

            if count < PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str, context: &str) -> Result<R, Error> {
        let response: OctocrabResult<R> = self.client.get(path, None::<&()>).await;
        response.map_err(|e| convert_error(context, e))
    }

    /// Issues a PUT whose success response has no body (201/204).
    async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<(), Error> {
        let response = self
            .client
            ._put(path, Some(body))
            .await
            .map_err(|e| convert_error(context, e))?;
        octocrab::map_github_error(response)
            .await
            .map(|_| ())
            .map_err(|e| convert_error(context, e))
    }

    /// Issues a DELETE whose success response has no body (204).
    async fn delete_no_content(&self, path: &str, context: &str) -> Result<(), Error> {
        let response = self
            .client
            ._delete(path, None::<&()>)
            .await
            .map_err(|e| convert_error(context, e))?;
        octocrab::map_github_error(response)
            .await
            .map(|_| ())
            .map_err(|e| convert_error(context, e))
    }

    async fn get_custom_property_values(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<CustomPropertyAssignment>, Error> {
        let path = api_path(&["repos", owner, repo, "properties", "values"])?;
        self.get_json(&path, "Failed to get custom property values")
            .await
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    #[instrument(skip(self))]
    async fn list_repositories(
        &self,
        owner: &str,
        is_org: bool,
    ) -> Result<Vec<RepositoryMetadata>, Error> {
        let account_kind = if is_org { "orgs" } else { "users" };
        let account_path = api_path(&[account_kind, owner])?;
        let repos_path = api_path(&[account_kind, owner, "repos"])?;

        let account: AccountDetails = self
            .get_json(&account_path, "Failed to get account details")
            .await?;
        let plan = account
            .plan
            .map(|p| p.name)
            .unwrap_or_else(|| FREE_PLAN.to_string());

        let listings: Vec<RepositoryListing> = self
            .get_pages(&repos_path, Some("full_name"), None, std::convert::identity)
            .await?;

        info!(
            owner = owner,
            plan = plan.as_str(),
            count = listings.len(),
            "Listed repositories"
        );

        let mut repositories = Vec::with_capacity(listings.len());
        for listing in listings {
            let properties = if listing.is_organization_owned() {
                self.get_custom_property_values(&listing.owner.login, &listing.name)
                    .await?
            } else {
                Vec::new()
            };
            repositories.push(listing.into_metadata(&plan, properties));
        }

        Ok(repositories)
    }

    #[instrument(skip(self, features))]
    async fn update_repository_features(
        &self,
        owner: &str,
        repo: &str,
        features: &RepositoryFeatures,
    ) -> Result<(), Error> {
        let path = api_path(&["repos", owner, repo])?;
        let response: OctocrabResult<serde_json::Value> =
            self.client.patch(path, Some(features)).await;
        response
            .map(|_| ())
            .map_err(|e| convert_error("Failed to update repository settings", e))
    }

    #[instrument(skip(self))]
    async fn list_rulesets(&self, owner: &str, repo: &str) -> Result<Vec<RulesetSummary>, Error> {
        let path = api_path(&["repos", owner, repo, "rulesets"])?;
        self.get_pages(&path, None, Some(false), std::convert::identity)
            .await
    }

    #[instrument(skip(self, ruleset), fields(ruleset = %ruleset.name))]
    async fn create_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset: &RepositoryRuleset,
    ) -> Result<RulesetSummary, Error> {
        let path = api_path(&["repos", owner, repo, "rulesets"])?;
        let response: OctocrabResult<RulesetSummary> =
            self.client.post(path, Some(ruleset)).await;
        response.map_err(|e| convert_error("Failed to create ruleset", e))
    }

    #[instrument(skip(self, ruleset), fields(ruleset = %ruleset.name))]
    async fn update_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset_id: u64,
        ruleset: &RepositoryRuleset,
    ) -> Result<RulesetSummary, Error> {
        let id = ruleset_id.to_string();
        let path = api_path(&["repos", owner, repo, "rulesets", &id])?;
        let response: OctocrabResult<RulesetSummary> = self.client.put(path, Some(ruleset)).await;
        response.map_err(|e| convert_error("Failed to update ruleset", e))
    }

    #[instrument(skip(self))]
    async fn delete_ruleset(&self, owner: &str, repo: &str, ruleset_id: u64) -> Result<(), Error> {
        let id = ruleset_id.to_string();
        let path = api_path(&["repos", owner, repo, "rulesets", &id])?;
        self.delete_no_content(&path, "Failed to delete ruleset")
            .await
    }

    #[instrument(skip(self))]
    async fn list_environments(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<EnvironmentSummary>, Error> {
        let path = api_path(&["repos", owner, repo, "environments"])?;
        self.get_pages(&path, None, None, |list: EnvironmentList| list.environments)
            .await
    }

    #[instrument(skip(self, settings))]
    async fn create_or_update_environment(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        settings: &EnvironmentSettings,
    ) -> Result<EnvironmentSummary, Error> {
        let path = api_path(&["repos", owner, repo, "environments", environment])?;
        let response: OctocrabResult<EnvironmentSummary> =
            self.client.put(path, Some(settings)).await;
        response.map_err(|e| convert_error("Failed to create or update environment", e))
    }

    #[instrument(skip(self))]
    async fn delete_environment(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<(), Error> {
        let path = api_path(&["repos", owner, repo, "environments", environment])?;
        self.delete_no_content(&path, "Failed to delete environment")
            .await
    }

    #[instrument(skip(self))]
    async fn list_protection_rules(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<DeploymentProtectionRule>, Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "deployment_protection_rules",
        ])?;
        let list: DeploymentProtectionRuleList = self
            .get_json(&path, "Failed to list deployment protection rules")
            .await?;
        Ok(list.custom_deployment_protection_rules)
    }

    #[instrument(skip(self))]
    async fn create_protection_rule(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        request: &ProtectionRuleRequest,
    ) -> Result<DeploymentProtectionRule, Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "deployment_protection_rules",
        ])?;
        let response: OctocrabResult<DeploymentProtectionRule> =
            self.client.post(path, Some(request)).await;
        response.map_err(|e| convert_error("Failed to create deployment protection rule", e))
    }

    #[instrument(skip(self))]
    async fn disable_protection_rule(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        rule_id: u64,
    ) -> Result<(), Error> {
        let id = rule_id.to_string();
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "deployment_protection_rules",
            &id,
        ])?;
        self.delete_no_content(&path, "Failed to disable deployment protection rule")
            .await
    }

    #[instrument(skip(self))]
    async fn list_branch_policies(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<BranchPolicy>, Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "deployment-branch-policies",
        ])?;
        self.get_pages(&path, None, None, |list: BranchPolicyList| {
            list.branch_policies
        })
        .await
    }

    #[instrument(skip(self))]
    async fn create_branch_policy(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        request: &BranchPolicyRequest,
    ) -> Result<BranchPolicy, Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "deployment-branch-policies",
        ])?;
        let response: OctocrabResult<BranchPolicy> = self.client.post(path, Some(request)).await;
        response.map_err(|e| convert_error("Failed to create deployment branch policy", e))
    }

    #[instrument(skip(self))]
    async fn delete_branch_policy(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        policy_id: u64,
    ) -> Result<(), Error> {
        let id = policy_id.to_string();
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "deployment-branch-policies",
            &id,
        ])?;
        self.delete_no_content(&path, "Failed to delete deployment branch policy")
            .await
    }

    #[instrument(skip(self))]
    async fn get_repository_public_key(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<PublicKey, Error> {
        let path = api_path(&["repos", owner, repo, "actions", "secrets", "public-key"])?;
        self.get_json(&path, "Failed to get repository public key")
            .await
    }

    #[instrument(skip(self))]
    async fn list_repository_secrets(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<SecretSummary>, Error> {
        let path = api_path(&["repos", owner, repo, "actions", "secrets"])?;
        self.get_pages(&path, None, None, |list: SecretList| list.secrets)
            .await
    }

    #[instrument(skip(self, secret))]
    async fn put_repository_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), Error> {
        let path = api_path(&["repos", owner, repo, "actions", "secrets", name])?;
        self.put_no_content(&path, secret, "Failed to write repository secret")
            .await
    }

    #[instrument(skip(self))]
    async fn delete_repository_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<(), Error> {
        let path = api_path(&["repos", owner, repo, "actions", "secrets", name])?;
        self.delete_no_content(&path, "Failed to delete repository secret")
            .await
    }

    #[instrument(skip(self))]
    async fn get_environment_public_key(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<PublicKey, Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "secrets",
            "public-key",
        ])?;
        self.get_json(&path, "Failed to get environment public key")
            .await
    }

    #[instrument(skip(self))]
    async fn list_environment_secrets(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<SecretSummary>, Error> {
        let path = api_path(&["repos", owner, repo, "environments", environment, "secrets"])?;
        self.get_pages(&path, None, None, |list: SecretList| list.secrets)
            .await
    }

    #[instrument(skip(self, secret))]
    async fn put_environment_secret(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        name: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "secrets",
            name,
        ])?;
        self.put_no_content(&path, secret, "Failed to write environment secret")
            .await
    }

    #[instrument(skip(self))]
    async fn delete_environment_secret(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        name: &str,
    ) -> Result<(), Error> {
        let path = api_path(&[
            "repos",
            owner,
            repo,
            "environments",
            environment,
            "secrets",
            name,
        ])?;
        self.delete_no_content(&path, "Failed to delete environment secret")
            .await
    }

    #[instrument(skip(self))]
    async fn update_actions_permissions(
        &self,
        owner: &str,
        repo: &str,
        permissions: &ActionsPermissions,
    ) -> Result<(), Error> {
        let path = api_path(&["repos", owner, repo, "actions", "permissions"])?;
        self.put_no_content(&path, permissions, "Failed to update Actions permissions")
            .await
    }

    #[instrument(skip(self))]
    async fn update_actions_access(
        &self,
        owner: &str,
        repo: &str,
        access: &ActionsAccessPermissions,
    ) -> Result<(), Error> {
        let path = api_path(&["repos", owner, repo, "actions", "permissions", "access"])?;
        self.put_no_content(&path, access, "Failed to update Actions access")
            .await
    }

    #[instrument(skip(self))]
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error> {
        let path = api_path(&["repos", owner, repo, "branches"])?;
        self.get_pages(&path, None, None, std::convert::identity)
            .await
    }

    #[instrument(skip(self))]
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, Error> {
        let route = contents_path(owner, repo, path)?;
        let response: OctocrabResult<serde_json::Value> =
            self.client.get(route, Some(&RefQuery { git_ref })).await;
        let value = response.map_err(|e| convert_error("Failed to get file", e))?;

        // Directory listings come back as an array of entries
        if value.is_array() {
            return Err(Error::UnexpectedContentType {
                path: path.to_string(),
                kind: EntryType::Dir.to_string(),
            });
        }

        let content: ContentResponse = serde_json::from_value(value)?;
        if !content.content_omitted() {
            return content.into_remote_file();
        }

        debug!(sha = %content.sha, "File content not inlined, reading its blob");
        let route = api_path(&["repos", owner, repo, "git", "blobs", &content.sha])?;
        let blob: BlobResponse = self.get_json(&route, "Failed to get file blob").await?;
        content.with_blob(blob).into_remote_file()
    }

    #[instrument(skip(self, content, options), fields(branch = %options.branch))]
    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        sha: Option<&str>,
        options: &CommitOptions,
    ) -> Result<CommitInfo, Error> {
        let route = contents_path(owner, repo, path)?;
        let body = FileWriteRequest {
            message: &options.message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            sha,
            branch: &options.branch,
            committer: &options.committer,
        };
        let response: OctocrabResult<FileCommitResponse> =
            self.client.put(route, Some(&body)).await;
        response
            .map(|r| r.commit)
            .map_err(|e| convert_error("Failed to write file", e))
    }

    #[instrument(skip(self, options), fields(branch = %options.branch))]
    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        options: &CommitOptions,
    ) -> Result<CommitInfo, Error> {
        let route = contents_path(owner, repo, path)?;
        let body = FileDeleteRequest {
            message: &options.message,
            sha,
            branch: &options.branch,
            committer: &options.committer,
        };
        let response: OctocrabResult<FileCommitResponse> =
            self.client.delete(route, Some(&body)).await;
        response
            .map(|r| r.commit)
            .map_err(|e| convert_error("Failed to delete file", e))
    }
}

/// Builds an API route from raw path segments, percent-encoding each one.
pub(crate) fn api_path(segments: &[&str]) -> Result<String, Error> {
    let mut url = Url::parse("https://api.github.com").map_err(|e| Error::ApiError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| Error::ApiError("Cannot build API path".to_string()))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

/// Route for a repository file, keeping the `/` separators of `path`.
fn contents_path(owner: &str, repo: &str, path: &str) -> Result<String, Error> {
    let mut segments = vec!["repos", owner, repo, "contents"];
    segments.extend(path.split('/').filter(|s| !s.is_empty()));
    api_path(&segments)
}

/// Maps an octocrab error onto [`Error`], logging everything but expected absence.
fn convert_error(message: &str, e: octocrab::Error) -> Error {
    if let octocrab::Error::GitHub { source, .. } = &e {
        let status = source.status_code;
        if status == StatusCode::NOT_FOUND {
            debug!(error_message = source.message.as_str(), "{}. Resource not found", message);
            return Error::NotFound;
        }

        let is_rate_limited = (status == StatusCode::FORBIDDEN
            || status == StatusCode::TOO_MANY_REQUESTS)
            && source.message.to_lowercase().contains("rate limit");
        let mapped = if is_rate_limited {
            Error::RateLimitExceeded
        } else {
            Error::Request {
                status: status.as_u16(),
                message: source.message.clone(),
            }
        };
        log_octocrab_error(message, e);
        return mapped;
    }

    let mapped = Error::ApiError(e.to_string());
    log_octocrab_error(message, e);
    mapped
}

/// Authenticates with GitHub using an installation access token for a specific app installation.
///
/// This function retrieves an access token for a GitHub App installation and creates a new
/// `Octocrab` client authenticated with that token.
///
/// # Arguments
///
/// * `octocrab` - A client authenticated as the GitHub App (see [`create_app_client`]).
/// * `installation_id` - The ID of the GitHub App installation.
///
/// # Errors
///
/// Returns `Error::AuthError` if the installation cannot be found or the access token
/// cannot be created.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{authenticate_with_access_token, create_app_client, Error};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let private_key = std::fs::read_to_string("app.pem").unwrap();
///     let app_client = create_app_client(123456, &private_key, None).await?;
///     let client = authenticate_with_access_token(&app_client, 12345678).await?;
///
///     // Use `client` to perform API operations
///     Ok(())
/// }
/// ```
#[instrument(skip(octocrab))]
pub async fn authenticate_with_access_token(
    octocrab: &Octocrab,
    installation_id: u64,
) -> Result<Octocrab, Error> {
    debug!(installation_id, "Finding installation");

    let (api_with_token, _) = octocrab
        .installation_and_token(installation_id.into())
        .await
        .map_err(|e| {
            error!(installation_id, "Failed to create a token for the installation");
            let message = e.to_string();
            log_octocrab_error("Failed to create installation token", e);
            Error::AuthError(message)
        })?;

    info!(installation_id, "Created access token for installation");

    Ok(api_with_token)
}

/// Creates an `Octocrab` client authenticated as a GitHub App using a JWT token.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App.
/// * `private_key` - The private key associated with the GitHub App, in PEM format.
/// * `base_uri` - API base URI for GitHub Enterprise Server, `None` for github.com.
///
/// # Errors
///
/// Returns `Error::AuthError` if the private key cannot be parsed or the client
/// cannot be built.
#[instrument(skip(private_key))]
pub async fn create_app_client(
    app_id: u64,
    private_key: &str,
    base_uri: Option<&str>,
) -> Result<Octocrab, Error> {
    info!(
        app_id = app_id,
        key_length = private_key.len(),
        "Creating GitHub App client with provided credentials"
    );

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let mut builder = Octocrab::builder();
    if let Some(uri) = base_uri {
        builder = builder
            .base_uri(uri)
            .map_err(|e| Error::AuthError(format!("Invalid API URL '{}': {}", uri, e)))?;
    }

    let octocrab = builder.app(app_id.into(), key).build().map_err(|e| {
        error!(
            app_id = app_id,
            error = ?e,
            "Failed to build Octocrab client with GitHub App credentials"
        );
        Error::AuthError("Failed to build the GitHub App client.".to_string())
    })?;

    info!(app_id = app_id, "Successfully created GitHub App client");

    Ok(octocrab)
}

/// Creates an `Octocrab` client authenticated with a personal access token.
#[instrument(skip(token))]
pub fn create_token_client(token: &SecretString, base_uri: Option<&str>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder();
    if let Some(uri) = base_uri {
        builder = builder
            .base_uri(uri)
            .map_err(|e| Error::AuthError(format!("Invalid API URL '{}': {}", uri, e)))?;
    }

    builder
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| Error::AuthError(e.to_string()))
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                status = err.status_code.as_u16(),
                error_message = err.message,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),

        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
