//! Repository ruleset domain types.
//!
//! This module contains types representing GitHub repository rulesets and their rules.
//! Rulesets provide a way to enforce repository governance policies on branches and tags.
//!
//! See: https://docs.github.com/en/rest/repos/rules

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "ruleset_tests.rs"]
mod tests;

/// A repository ruleset definition.
///
/// The same type is used as the desired state in configuration and as the request body
/// for creating or updating a ruleset, so it only carries writable fields.
///
/// # Examples
///
/// ```rust
/// use github_client::{RepositoryRuleset, Rule, RulesetEnforcement, RulesetTarget};
///
/// let ruleset = RepositoryRuleset {
///     name: "main-protection".to_string(),
///     target: Some(RulesetTarget::Branch),
///     enforcement: RulesetEnforcement::Active,
///     bypass_actors: None,
///     conditions: None,
///     rules: vec![Rule::Deletion, Rule::NonFastForward],
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RepositoryRuleset {
    /// Ruleset name, unique within a repository
    pub name: String,

    /// Target type. GitHub defaults to `branch` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<RulesetTarget>,

    /// Enforcement level
    pub enforcement: RulesetEnforcement,

    /// Actors who can bypass this ruleset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_actors: Option<Vec<BypassActor>>,

    /// Conditions for when this ruleset applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<RulesetConditions>,

    /// Rules in this ruleset
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A ruleset as returned by `GET /repos/{owner}/{repo}/rulesets`.
///
/// The listing does not include rules, only the identity of each ruleset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RulesetSummary {
    /// Ruleset ID
    pub id: u64,

    /// Ruleset name
    pub name: String,

    /// Source of the ruleset (repository or organization name)
    #[serde(default)]
    pub source: Option<String>,
}

/// Target type for a ruleset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RulesetTarget {
    /// Ruleset applies to branches
    Branch,
    /// Ruleset applies to tags
    Tag,
    /// Ruleset applies to pushes
    Push,
}

/// Enforcement level for a ruleset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RulesetEnforcement {
    /// Ruleset is disabled
    Disabled,
    /// Ruleset is active and enforced
    Active,
    /// Ruleset is in evaluation mode (logs only, doesn't block)
    Evaluate,
}

/// Actor who can bypass a ruleset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BypassActor {
    /// Actor ID. Not used for `OrganizationAdmin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<u64>,

    /// Actor type
    pub actor_type: BypassActorType,

    /// Bypass mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_mode: Option<BypassMode>,
}

/// Type of actor that can bypass a ruleset.
///
/// The `RepositoryRole` variant covers the admin, maintain and write roles; the
/// specific role is selected through `actor_id`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum BypassActorType {
    /// Organization admin role
    OrganizationAdmin,
    /// Repository-level role (admin, maintain, write)
    RepositoryRole,
    /// Team (use team ID as actor_id)
    Team,
    /// Integration (GitHub App)
    Integration,
    /// Deploy key
    DeployKey,
}

/// Mode for bypassing a ruleset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BypassMode {
    /// Always allow bypass
    Always,
    /// Bypass only through a pull request
    PullRequest,
    /// Exempt from the rules without being listed as a bypass
    Exempt,
}

/// Conditions for when a ruleset applies.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RulesetConditions {
    /// Reference name patterns
    pub ref_name: RefNameCondition,
}

/// Reference name condition.
///
/// Patterns accept `~DEFAULT_BRANCH` and `~ALL` in addition to `fnmatch` globs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RefNameCondition {
    /// Patterns to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Patterns to exclude
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A rule within a ruleset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Prevent creation of matching refs
    Creation,

    /// Prevent updates to matching refs
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameters: Option<UpdateParameters>,
    },

    /// Prevent deletion of matching refs
    Deletion,

    /// Require linear history (no merge commits)
    RequiredLinearHistory,

    /// Require signed commits
    RequiredSignatures,

    /// Prevent force pushes
    NonFastForward,

    /// Require successful deployments before merging
    RequiredDeployments {
        parameters: RequiredDeploymentsParameters,
    },

    /// Pull request requirements
    PullRequest { parameters: PullRequestParameters },

    /// Required status checks
    RequiredStatusChecks {
        parameters: RequiredStatusChecksParameters,
    },

    /// Merges must go through a merge queue
    MergeQueue { parameters: MergeQueueParameters },

    CommitMessagePattern { parameters: PatternParameters },

    CommitAuthorEmailPattern { parameters: PatternParameters },

    CommitterEmailPattern { parameters: PatternParameters },

    BranchNamePattern { parameters: PatternParameters },

    TagNamePattern { parameters: PatternParameters },

    /// Block pushes that touch the listed paths
    FilePathRestriction {
        parameters: FilePathRestrictionParameters,
    },

    /// Block pushes that add files with the listed extensions
    FileExtensionRestriction {
        parameters: FileExtensionRestrictionParameters,
    },

    MaxFilePathLength {
        parameters: MaxFilePathLengthParameters,
    },

    MaxFileSize { parameters: MaxFileSizeParameters },

    /// Require workflows to pass before merging
    Workflows { parameters: WorkflowsParameters },

    /// Require code scanning results before merging
    CodeScanning { parameters: CodeScanningParameters },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateParameters {
    /// Branch can pull changes from its upstream repository
    pub update_allows_fetch_and_merge: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RequiredDeploymentsParameters {
    /// Environments that must be successfully deployed to
    pub required_deployment_environments: Vec<String>,
}

/// Parameters for pull request rules.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PullRequestParameters {
    /// Dismiss stale reviews when new commits are pushed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews_on_push: Option<bool>,

    /// Require code owner review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_code_owner_review: Option<bool>,

    /// Require last push approval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,

    /// Required approving review count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,

    /// Required review thread resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_review_thread_resolution: Option<bool>,

    /// Allowed merge methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_merge_methods: Option<Vec<MergeMethod>>,
}

/// Parameters for required status checks.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RequiredStatusChecksParameters {
    /// Required status checks
    pub required_status_checks: Vec<StatusCheck>,

    /// Require branches to be up to date before merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_required_status_checks_policy: Option<bool>,

    /// Allow repositories and branches to be created even if checks would fail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_enforce_on_create: Option<bool>,
}

/// A required status check.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StatusCheck {
    /// Status check context
    pub context: String,

    /// Integration ID (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<u64>,
}

/// Allowed merge methods for pull requests.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MergeMethod {
    /// Merge commit
    Merge,
    /// Squash merge
    Squash,
    /// Rebase merge
    Rebase,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MergeQueueParameters {
    pub check_response_timeout_minutes: u32,
    pub grouping_strategy: MergeQueueGroupingStrategy,
    pub max_entries_to_build: u32,
    pub max_entries_to_merge: u32,
    pub merge_method: MergeQueueMergeMethod,
    pub min_entries_to_merge: u32,
    pub min_entries_to_merge_wait_minutes: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum MergeQueueGroupingStrategy {
    /// Every entry in the group must pass
    Allgreen,
    /// Only the head entry must pass
    Headgreen,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum MergeQueueMergeMethod {
    Merge,
    Squash,
    Rebase,
}

/// Parameters shared by the name and email pattern rules.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PatternParameters {
    /// How the rule is shown to users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The rule matches when the pattern does not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,

    pub operator: PatternOperator,

    pub pattern: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatternOperator {
    StartsWith,
    EndsWith,
    Contains,
    Regex,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FilePathRestrictionParameters {
    pub restricted_file_paths: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileExtensionRestrictionParameters {
    pub restricted_file_extensions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MaxFilePathLengthParameters {
    pub max_file_path_length: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MaxFileSizeParameters {
    /// Maximum file size in megabytes
    pub max_file_size: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WorkflowsParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_enforce_on_create: Option<bool>,

    pub workflows: Vec<WorkflowReference>,
}

/// A workflow that must pass, identified by path within a repository.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WorkflowReference {
    pub path: String,

    pub repository_id: u64,

    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CodeScanningParameters {
    pub code_scanning_tools: Vec<CodeScanningTool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CodeScanningTool {
    /// `none`, `errors`, `errors_and_warnings` or `all`
    pub alerts_threshold: String,

    /// `none`, `critical`, `high_or_higher`, `medium_or_higher` or `all`
    pub security_alerts_threshold: String,

    /// Name of the code scanning tool
    pub tool: String,
}
