//! Reconciliation rules, one per resource kind.
//!
//! Every rule follows the same three steps against a repository: extract its slice of
//! desired state from the element, check eligibility, then apply. [`Rule::ALL`] fixes
//! the order rules run in: features, the environment family, rulesets, Actions settings
//! and finally files, so an environment exists before its sub-resources are reconciled.

use config_manager::{
    ActionSecret, Element, EnvironmentDefinition, FileMapping, FilesOperation, MergeFile,
};
use github_client::{
    ActionsAccessPermissions, ActionsPermissions, RepositoryClient, RepositoryFeatures,
    RepositoryMetadata, RepositoryRuleset,
};

use crate::content::FileContentResolver;
use crate::errors::SyncResult;
use crate::run_context::RunContext;

mod actions;
mod environments;
mod features;
mod files;
mod rulesets;
mod secrets;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub const ARCHIVED: &str = "Repository is archived";
pub const PLAN_RESTRICTION: &str = "Your plan does not allow it";
pub const NOT_PRIVATE: &str = "Repository must be private or internal";
pub const DEFAULT_BRANCH_UNKNOWN: &str = "Default branch unknown";

/// Collaborators a rule needs while applying.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub client: &'a dyn RepositoryClient,
    pub resolver: &'a FileContentResolver,
    pub run: &'a RunContext,
}

/// The closed set of reconciliation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Features,
    Environments,
    EnvironmentProtectionRules,
    EnvironmentBranchPolicies,
    EnvironmentSecrets,
    EnvironmentsDeletion,
    Rulesets,
    RulesetsDeletion,
    ActionsPermissions,
    ActionsAccessPermissions,
    ActionSecrets,
    Files,
    MergeFiles,
}

impl Rule {
    /// Every rule, in execution order.
    pub const ALL: [Rule; 13] = [
        Rule::Features,
        Rule::Environments,
        Rule::EnvironmentProtectionRules,
        Rule::EnvironmentBranchPolicies,
        Rule::EnvironmentSecrets,
        Rule::EnvironmentsDeletion,
        Rule::Rulesets,
        Rule::RulesetsDeletion,
        Rule::ActionsPermissions,
        Rule::ActionsAccessPermissions,
        Rule::ActionSecrets,
        Rule::Files,
        Rule::MergeFiles,
    ];

    /// Name used in logs and run reports.
    pub fn name(self) -> &'static str {
        match self {
            Rule::Features => "feature",
            Rule::Environments => "environments creation/update",
            Rule::EnvironmentProtectionRules => {
                "environment protection rules creation/update/disable"
            }
            Rule::EnvironmentBranchPolicies => {
                "environment branch protection creation/update/deletion"
            }
            Rule::EnvironmentSecrets => "environment secrets creation/update/delete",
            Rule::EnvironmentsDeletion => "environments deletion",
            Rule::Rulesets => "rulesets creation/update",
            Rule::RulesetsDeletion => "rulesets deletion",
            Rule::ActionsPermissions => "action permissions",
            Rule::ActionsAccessPermissions => "action permissions access",
            Rule::ActionSecrets => "action secrets",
            Rule::Files => "files sync",
            Rule::MergeFiles => "merge files sync",
        }
    }

    /// The desired state this rule reconciles, or `None` when the element does not
    /// configure it.
    pub fn extract(self, element: &Element) -> Option<Desired<'_>> {
        let environments = || element.environments.as_deref();
        match self {
            Rule::Features => element.features.as_ref().map(Desired::Features),
            Rule::Environments => environments().map(Desired::Environments),
            Rule::EnvironmentProtectionRules => {
                environments().map(Desired::EnvironmentProtectionRules)
            }
            Rule::EnvironmentBranchPolicies => {
                environments().map(Desired::EnvironmentBranchPolicies)
            }
            Rule::EnvironmentSecrets => environments().map(Desired::EnvironmentSecrets),
            Rule::EnvironmentsDeletion => element
                .delete_environments
                .as_deref()
                .map(Desired::EnvironmentsDeletion),
            Rule::Rulesets => element.rulesets.as_deref().map(Desired::Rulesets),
            Rule::RulesetsDeletion => element
                .delete_rulesets
                .as_deref()
                .map(Desired::RulesetsDeletion),
            Rule::ActionsPermissions => element
                .actions
                .as_ref()
                .and_then(|a| a.permissions.as_ref())
                .map(Desired::ActionsPermissions),
            Rule::ActionsAccessPermissions => element
                .actions
                .as_ref()
                .and_then(|a| a.access_permissions.as_ref())
                .map(Desired::ActionsAccessPermissions),
            Rule::ActionSecrets => element
                .actions
                .as_ref()
                .and_then(|a| a.secrets.as_deref())
                .map(Desired::ActionSecrets),
            Rule::Files => element.files.as_ref().map(Desired::Files),
            Rule::MergeFiles => element.merge_files.as_ref().map(Desired::MergeFiles),
        }
    }

    /// Why the rule cannot run on `repository`, or `None` when it can.
    pub fn ineligibility(self, repository: &RepositoryMetadata) -> Option<&'static str> {
        match self {
            Rule::Rulesets | Rule::RulesetsDeletion => {
                if repository.archived {
                    Some(ARCHIVED)
                } else if repository.is_private_on_free_plan() {
                    Some(PLAN_RESTRICTION)
                } else {
                    None
                }
            }
            Rule::ActionsAccessPermissions => {
                (!repository.is_private_or_internal()).then_some(NOT_PRIVATE)
            }
            Rule::Files | Rule::MergeFiles => {
                if repository.archived {
                    Some(ARCHIVED)
                } else if repository.default_branch.is_none() {
                    Some(DEFAULT_BRANCH_UNKNOWN)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Desired state extracted by a [`Rule`], borrowed from the configuration element.
#[derive(Debug, Clone, Copy)]
pub enum Desired<'a> {
    Features(&'a RepositoryFeatures),
    Environments(&'a [EnvironmentDefinition]),
    EnvironmentProtectionRules(&'a [EnvironmentDefinition]),
    EnvironmentBranchPolicies(&'a [EnvironmentDefinition]),
    EnvironmentSecrets(&'a [EnvironmentDefinition]),
    EnvironmentsDeletion(&'a [String]),
    Rulesets(&'a [RepositoryRuleset]),
    RulesetsDeletion(&'a [String]),
    ActionsPermissions(&'a ActionsPermissions),
    ActionsAccessPermissions(&'a ActionsAccessPermissions),
    ActionSecrets(&'a [ActionSecret]),
    Files(&'a FilesOperation<FileMapping>),
    MergeFiles(&'a FilesOperation<MergeFile>),
}

impl Desired<'_> {
    /// Converges `repository` towards this desired state.
    pub async fn apply(
        self,
        ctx: RuleContext<'_>,
        repository: &RepositoryMetadata,
    ) -> SyncResult<()> {
        match self {
            Desired::Features(features) => {
                features::apply_features(ctx, repository, features).await
            }
            Desired::Environments(environments) => {
                environments::apply_environments(ctx, repository, environments).await
            }
            Desired::EnvironmentProtectionRules(environments) => {
                environments::apply_protection_rules(ctx, repository, environments).await
            }
            Desired::EnvironmentBranchPolicies(environments) => {
                environments::apply_branch_policies(ctx, repository, environments).await
            }
            Desired::EnvironmentSecrets(environments) => {
                environments::apply_environment_secrets(ctx, repository, environments).await
            }
            Desired::EnvironmentsDeletion(names) => {
                environments::delete_environments(ctx, repository, names).await
            }
            Desired::Rulesets(rulesets) => {
                rulesets::apply_rulesets(ctx, repository, rulesets).await
            }
            Desired::RulesetsDeletion(names) => {
                rulesets::delete_rulesets(ctx, repository, names).await
            }
            Desired::ActionsPermissions(permissions) => {
                actions::apply_permissions(ctx, repository, permissions).await
            }
            Desired::ActionsAccessPermissions(access) => {
                actions::apply_access(ctx, repository, access).await
            }
            Desired::ActionSecrets(secrets) => {
                secrets::sync_secrets(ctx, repository, secrets::SecretScope::Repository, secrets)
                    .await
            }
            Desired::Files(operation) => files::sync_files(ctx, repository, operation).await,
            Desired::MergeFiles(operation) => files::sync_files(ctx, repository, operation).await,
        }
    }
}
