//! Repository domain types.
//!
//! This module contains the read-side snapshot of a repository ([`RepositoryMetadata`])
//! and the repository settings payload ([`RepositoryFeatures`]) used to update it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::custom_property::CustomPropertyAssignment;

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Name GitHub reports for the free plan.
pub const FREE_PLAN: &str = "free";

/// Repository visibility as reported by GitHub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone
    #[default]
    Public,
    /// Visible to collaborators only
    Private,
    /// Visible to members of the enterprise
    Internal,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        };
        f.write_str(text)
    }
}

/// Read-once metadata for a repository.
///
/// A snapshot is fetched fresh for every run and never mutated locally. It is the
/// context every reconciliation rule consults to decide whether it applies to the
/// repository and which conditional entries are included.
///
/// # Examples
///
/// ```rust
/// use github_client::{RepositoryMetadata, Visibility};
///
/// let repo = RepositoryMetadata {
///     owner: "my-org".to_string(),
///     owner_type: "Organization".to_string(),
///     name: "service".to_string(),
///     full_name: "my-org/service".to_string(),
///     html_url: None,
///     visibility: Visibility::Private,
///     private: true,
///     plan: "free".to_string(),
///     archived: false,
///     default_branch: Some("main".to_string()),
///     properties: vec![],
/// };
///
/// assert!(repo.is_private_on_free_plan());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Login of the owning user or organization
    pub owner: String,

    /// Owner account type (`User` or `Organization`)
    pub owner_type: String,

    /// Repository name without the owner
    pub name: String,

    /// Full name (`owner/name`)
    pub full_name: String,

    /// Web URL of the repository
    pub html_url: Option<String>,

    /// Visibility of the repository
    pub visibility: Visibility,

    /// Whether the repository is private. Internal repositories are private as well.
    pub private: bool,

    /// Plan name of the owning account
    pub plan: String,

    /// Whether the repository is archived
    pub archived: bool,

    /// Default branch, if GitHub reported one
    pub default_branch: Option<String>,

    /// Custom property values assigned to the repository
    pub properties: Vec<CustomPropertyAssignment>,
}

impl RepositoryMetadata {
    /// Returns true when the owning account is on the free plan.
    pub fn is_free_plan(&self) -> bool {
        self.plan.eq_ignore_ascii_case(FREE_PLAN)
    }

    /// Returns true for private repositories owned by a free-plan account.
    ///
    /// Several repository features (rulesets, environment reviewers, wait timers)
    /// are unavailable in this combination.
    pub fn is_private_on_free_plan(&self) -> bool {
        self.private && self.is_free_plan()
    }

    /// Returns true when the repository is private or internal.
    pub fn is_private_or_internal(&self) -> bool {
        matches!(self.visibility, Visibility::Private | Visibility::Internal)
    }
}

/// Repository entry as returned by the repository listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryListing {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub private: bool,
    pub owner: RepositoryOwner,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryOwner {
    pub login: String,
    #[serde(rename = "type")]
    pub owner_type: String,
}

impl RepositoryListing {
    pub(crate) fn is_organization_owned(&self) -> bool {
        self.owner.owner_type == "Organization"
    }

    pub(crate) fn into_metadata(
        self,
        plan: &str,
        properties: Vec<CustomPropertyAssignment>,
    ) -> RepositoryMetadata {
        RepositoryMetadata {
            owner: self.owner.login,
            owner_type: self.owner.owner_type,
            name: self.name,
            full_name: self.full_name,
            html_url: self.html_url,
            visibility: self.visibility.unwrap_or_default(),
            private: self.private,
            plan: plan.to_string(),
            archived: self.archived.unwrap_or(false),
            default_branch: self.default_branch,
            properties,
        }
    }
}

/// Account (user or organization) details needed to derive the plan.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountDetails {
    #[serde(default)]
    pub plan: Option<AccountPlan>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountPlan {
    pub name: String,
}

/// Represents the repository settings that can be updated.
///
/// Only the fields that are set are sent, so a partial definition leaves the other
/// settings of the repository untouched.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RepositoryFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_discussions: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_update_branch: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_squash_pr_title_as_default: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_title: Option<SquashMergeCommitTitle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_message: Option<SquashMergeCommitMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_title: Option<MergeCommitTitle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<MergeCommitMessage>,
}

/// Default title for squash merge commits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SquashMergeCommitTitle {
    PrTitle,
    CommitOrPrTitle,
}

/// Default message for squash merge commits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SquashMergeCommitMessage {
    PrBody,
    CommitMessages,
    Blank,
}

/// Default title for merge commits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeCommitTitle {
    PrTitle,
    MergeMessage,
}

/// Default message for merge commits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeCommitMessage {
    PrBody,
    PrTitle,
    Blank,
}
