//! Deployment environment domain types.
//!
//! Environments carry deployment settings (wait timer, reviewers, branch policy) plus
//! two sub-collections that are reconciled separately: custom deployment protection
//! rules (GitHub Apps) and deployment branch policies.
//!
//! See: https://docs.github.com/en/rest/deployments/environments

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;

/// Settings sent to `PUT /repos/{owner}/{repo}/environments/{environment_name}`.
///
/// # Examples
///
/// ```rust
/// use github_client::{DeploymentBranchPolicy, EnvironmentSettings};
///
/// let settings = EnvironmentSettings {
///     wait_timer: Some(30),
///     deployment_branch_policy: Some(DeploymentBranchPolicy {
///         protected_branches: false,
///         custom_branch_policies: true,
///     }),
///     ..Default::default()
/// };
///
/// assert!(settings.uses_custom_branch_policies());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentSettings {
    /// Minutes to wait before allowing deployments to proceed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_timer: Option<u32>,

    /// Prevent the user who triggered a deployment from approving it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevent_self_review: Option<bool>,

    /// Users or teams that may approve deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<EnvironmentReviewer>>,

    /// Which branches can deploy to the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_branch_policy: Option<DeploymentBranchPolicy>,
}

impl EnvironmentSettings {
    /// Returns true when deployments are restricted by custom branch policies.
    pub fn uses_custom_branch_policies(&self) -> bool {
        self.deployment_branch_policy
            .as_ref()
            .is_some_and(|policy| policy.custom_branch_policies)
    }
}

/// A required reviewer for an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentReviewer {
    #[serde(rename = "type")]
    pub reviewer_type: ReviewerType,

    /// User or team ID
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ReviewerType {
    User,
    Team,
}

/// Branch restriction for deployments.
///
/// Exactly one of the two flags may be true. Sending no policy at all allows every
/// branch to deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DeploymentBranchPolicy {
    pub protected_branches: bool,
    pub custom_branch_policies: bool,
}

/// An environment as listed by `GET /repos/{owner}/{repo}/environments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvironmentList {
    #[serde(default)]
    pub environments: Vec<EnvironmentSummary>,
}

/// A custom deployment protection rule enabled on an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentProtectionRule {
    pub id: u64,
    #[serde(default)]
    pub enabled: bool,
    pub app: ProtectionRuleApp,
}

/// The GitHub App providing a deployment protection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionRuleApp {
    #[serde(default)]
    pub id: Option<u64>,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentProtectionRuleList {
    #[serde(default)]
    pub custom_deployment_protection_rules: Vec<DeploymentProtectionRule>,
}

/// Body for enabling a custom deployment protection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionRuleRequest {
    /// ID of the GitHub App integration providing the rule
    pub integration_id: u64,
}

/// Kind of ref a deployment branch policy matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BranchPolicyType {
    #[default]
    Branch,
    Tag,
}

/// A deployment branch policy as returned by GitHub.
///
/// Fields are optional because GitHub omits them for partially provisioned policies;
/// reconciliation ignores entries without both an ID and a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPolicy {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub policy_type: Option<BranchPolicyType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchPolicyList {
    #[serde(default)]
    pub branch_policies: Vec<BranchPolicy>,
}

/// Body for creating a deployment branch policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BranchPolicyRequest {
    /// Name pattern that branches or tags must match
    pub name: String,

    #[serde(default, rename = "type")]
    pub policy_type: BranchPolicyType,
}
