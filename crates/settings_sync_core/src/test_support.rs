//! Fixtures and a recording in-memory `RepositoryClient` shared by the unit tests.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use config_manager::Element;
use crypto_box::SecretKey;
use github_client::{
    ActionsAccessPermissions, ActionsPermissions, Branch, BranchPolicy, BranchPolicyRequest,
    CommitInfo, CommitOptions, CustomPropertyAssignment, CustomPropertyValue,
    DeploymentProtectionRule, EncryptedSecret, EnvironmentSettings, EnvironmentSummary, Error,
    ProtectionRuleApp, ProtectionRuleRequest, PublicKey, RemoteFile, RepositoryClient,
    RepositoryFeatures, RepositoryMetadata, RepositoryRuleset, RulesetSummary, SecretSummary,
    Visibility,
};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::content::FileContentResolver;
use crate::rules::RuleContext;
use crate::run_context::RunContext;

/// Deterministic key pair so tests can open sealed secrets.
pub fn secret_key() -> SecretKey {
    SecretKey::from([7u8; 32])
}

pub fn public_key() -> PublicKey {
    PublicKey {
        key_id: "key-1".to_string(),
        key: STANDARD.encode(secret_key().public_key().as_bytes()),
    }
}

/// A public, non-archived repository on a paid plan with a `main` default branch.
pub fn repository(owner: &str, name: &str) -> RepositoryMetadata {
    RepositoryMetadata {
        owner: owner.to_string(),
        owner_type: "Organization".to_string(),
        name: name.to_string(),
        full_name: format!("{}/{}", owner, name),
        html_url: Some(format!("https://github.com/{}/{}", owner, name)),
        visibility: Visibility::Public,
        private: false,
        plan: "team".to_string(),
        archived: false,
        default_branch: Some("main".to_string()),
        properties: Vec::new(),
    }
}

pub fn private_free_repository(owner: &str, name: &str) -> RepositoryMetadata {
    RepositoryMetadata {
        visibility: Visibility::Private,
        private: true,
        plan: "free".to_string(),
        ..repository(owner, name)
    }
}

pub fn with_property(
    mut repository: RepositoryMetadata,
    name: &str,
    value: &str,
) -> RepositoryMetadata {
    repository.properties.push(CustomPropertyAssignment {
        property_name: name.to_string(),
        value: Some(CustomPropertyValue::Single(value.to_string())),
    });
    repository
}

/// Parses one configuration element from YAML.
pub fn element(yaml: &str) -> Element {
    serde_yaml::from_str(yaml).expect("valid element")
}

pub fn protection_rule(id: u64, slug: &str, enabled: bool) -> DeploymentProtectionRule {
    DeploymentProtectionRule {
        id,
        enabled,
        app: ProtectionRuleApp {
            id: Some(id),
            slug: slug.to_string(),
        },
    }
}

pub fn branch_policy(id: u64, name: &str) -> BranchPolicy {
    BranchPolicy {
        id: Some(id),
        name: Some(name.to_string()),
        policy_type: None,
    }
}

pub fn remote_file(path: &str, sha: &str, content: &str) -> RemoteFile {
    RemoteFile {
        path: path.to_string(),
        sha: sha.to_string(),
        content: content.as_bytes().to_vec(),
    }
}

pub fn run_context() -> RunContext {
    RunContext {
        self_repository: "octo-org/settings".to_string(),
        run_id: "42".to_string(),
        run_number: "7".to_string(),
    }
}

/// Owns everything a [`RuleContext`] borrows.
pub struct Harness {
    pub client: MockClient,
    pub resolver: FileContentResolver,
    pub run: RunContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_source_root(".")
    }

    pub fn with_source_root(root: impl Into<PathBuf>) -> Self {
        Self {
            client: MockClient::new(),
            resolver: FileContentResolver::new(root),
            run: run_context(),
        }
    }

    pub fn ctx(&self) -> RuleContext<'_> {
        RuleContext {
            client: &self.client,
            resolver: &self.resolver,
            run: &self.run,
        }
    }
}

/// State behind [`MockClient`]. Tests seed it, run code, then inspect it.
#[derive(Debug, Default)]
pub struct MockState {
    pub repositories: Vec<RepositoryMetadata>,
    pub rulesets: Vec<RulesetSummary>,
    pub environments: Vec<EnvironmentSummary>,
    pub protection_rules: HashMap<String, Vec<DeploymentProtectionRule>>,
    pub branch_policies: HashMap<String, Vec<BranchPolicy>>,
    pub repository_secrets: Vec<SecretSummary>,
    pub environment_secrets: HashMap<String, Vec<SecretSummary>>,
    pub branches: Vec<String>,
    pub files: HashMap<String, RemoteFile>,
    pub public_key: Option<PublicKey>,

    /// Operation names that fail with a 500 response
    pub failing: HashSet<&'static str>,

    /// Every call, as `operation target`
    pub calls: Vec<String>,
    pub features_written: Vec<RepositoryFeatures>,
    pub environments_written: Vec<(String, EnvironmentSettings)>,
    pub secrets_written: Vec<(String, EncryptedSecret)>,
    pub files_written: Vec<(String, Vec<u8>, Option<String>, CommitOptions)>,
    pub files_deleted: Vec<(String, String, CommitOptions)>,
    next_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

const READ_OPERATIONS: &[&str] = &[
    "list_repositories",
    "list_rulesets",
    "list_environments",
    "list_protection_rules",
    "list_branch_policies",
    "get_repository_public_key",
    "list_repository_secrets",
    "get_environment_public_key",
    "list_environment_secrets",
    "list_branches",
    "get_file",
];

impl MockClient {
    pub fn new() -> Self {
        let client = Self::default();
        {
            let mut state = client.state.try_lock().expect("fresh mock is unlocked");
            state.branches = vec!["main".to_string()];
            state.public_key = Some(public_key());
        }
        client
    }

    pub async fn state(&self) -> tokio::sync::MutexGuard<'_, MockState> {
        self.state.lock().await
    }

    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    /// Calls that change remote state.
    pub async fn writes(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| {
                let operation = call.split(' ').next().unwrap_or_default();
                !READ_OPERATIONS.contains(&operation)
            })
            .cloned()
            .collect()
    }

    async fn record(&self, operation: &'static str, target: String) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("{} {}", operation, target));
        if state.failing.contains(operation) {
            return Err(Error::Request {
                status: 500,
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryClient for MockClient {
    async fn list_repositories(
        &self,
        owner: &str,
        _is_org: bool,
    ) -> Result<Vec<RepositoryMetadata>, Error> {
        self.record("list_repositories", owner.to_string()).await?;
        Ok(self.state.lock().await.repositories.clone())
    }

    async fn update_repository_features(
        &self,
        owner: &str,
        repo: &str,
        features: &RepositoryFeatures,
    ) -> Result<(), Error> {
        self.record("update_repository_features", format!("{}/{}", owner, repo))
            .await?;
        self.state.lock().await.features_written.push(features.clone());
        Ok(())
    }

    async fn list_rulesets(&self, owner: &str, repo: &str) -> Result<Vec<RulesetSummary>, Error> {
        self.record("list_rulesets", format!("{}/{}", owner, repo))
            .await?;
        Ok(self.state.lock().await.rulesets.clone())
    }

    async fn create_ruleset(
        &self,
        _owner: &str,
        _repo: &str,
        ruleset: &RepositoryRuleset,
    ) -> Result<RulesetSummary, Error> {
        self.record("create_ruleset", ruleset.name.clone()).await?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let created = RulesetSummary {
            id: 1000 + state.next_id,
            name: ruleset.name.clone(),
            source: None,
        };
        state.rulesets.push(created.clone());
        Ok(created)
    }

    async fn update_ruleset(
        &self,
        _owner: &str,
        _repo: &str,
        ruleset_id: u64,
        ruleset: &RepositoryRuleset,
    ) -> Result<RulesetSummary, Error> {
        self.record("update_ruleset", format!("{} {}", ruleset_id, ruleset.name))
            .await?;
        Ok(RulesetSummary {
            id: ruleset_id,
            name: ruleset.name.clone(),
            source: None,
        })
    }

    async fn delete_ruleset(&self, _owner: &str, _repo: &str, ruleset_id: u64) -> Result<(), Error> {
        self.record("delete_ruleset", ruleset_id.to_string()).await?;
        self.state
            .lock()
            .await
            .rulesets
            .retain(|r| r.id != ruleset_id);
        Ok(())
    }

    async fn list_environments(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<EnvironmentSummary>, Error> {
        self.record("list_environments", format!("{}/{}", owner, repo))
            .await?;
        Ok(self.state.lock().await.environments.clone())
    }

    async fn create_or_update_environment(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        settings: &EnvironmentSettings,
    ) -> Result<EnvironmentSummary, Error> {
        self.record("create_or_update_environment", environment.to_string())
            .await?;
        let mut state = self.state.lock().await;
        state
            .environments_written
            .push((environment.to_string(), settings.clone()));
        state.next_id += 1;
        Ok(EnvironmentSummary {
            id: state.next_id,
            name: environment.to_string(),
        })
    }

    async fn delete_environment(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
    ) -> Result<(), Error> {
        self.record("delete_environment", environment.to_string())
            .await?;
        Ok(())
    }

    async fn list_protection_rules(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
    ) -> Result<Vec<DeploymentProtectionRule>, Error> {
        self.record("list_protection_rules", environment.to_string())
            .await?;
        Ok(self
            .state
            .lock()
            .await
            .protection_rules
            .get(environment)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_protection_rule(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        request: &ProtectionRuleRequest,
    ) -> Result<DeploymentProtectionRule, Error> {
        self.record(
            "create_protection_rule",
            format!("{} {}", environment, request.integration_id),
        )
        .await?;
        Ok(protection_rule(request.integration_id, "created", true))
    }

    async fn disable_protection_rule(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        rule_id: u64,
    ) -> Result<(), Error> {
        self.record(
            "disable_protection_rule",
            format!("{} {}", environment, rule_id),
        )
        .await
    }

    async fn list_branch_policies(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
    ) -> Result<Vec<BranchPolicy>, Error> {
        self.record("list_branch_policies", environment.to_string())
            .await?;
        Ok(self
            .state
            .lock()
            .await
            .branch_policies
            .get(environment)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_branch_policy(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        request: &BranchPolicyRequest,
    ) -> Result<BranchPolicy, Error> {
        self.record(
            "create_branch_policy",
            format!("{} {}", environment, request.name),
        )
        .await?;
        Ok(BranchPolicy {
            id: Some(1),
            name: Some(request.name.clone()),
            policy_type: Some(request.policy_type),
        })
    }

    async fn delete_branch_policy(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        policy_id: u64,
    ) -> Result<(), Error> {
        self.record(
            "delete_branch_policy",
            format!("{} {}", environment, policy_id),
        )
        .await
    }

    async fn get_repository_public_key(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<PublicKey, Error> {
        self.record("get_repository_public_key", format!("{}/{}", owner, repo))
            .await?;
        self.state
            .lock()
            .await
            .public_key
            .clone()
            .ok_or(Error::NotFound)
    }

    async fn list_repository_secrets(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<SecretSummary>, Error> {
        self.record("list_repository_secrets", format!("{}/{}", owner, repo))
            .await?;
        Ok(self.state.lock().await.repository_secrets.clone())
    }

    async fn put_repository_secret(
        &self,
        _owner: &str,
        _repo: &str,
        name: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), Error> {
        self.record("put_repository_secret", name.to_string())
            .await?;
        self.state
            .lock()
            .await
            .secrets_written
            .push((name.to_string(), secret.clone()));
        Ok(())
    }

    async fn delete_repository_secret(
        &self,
        _owner: &str,
        _repo: &str,
        name: &str,
    ) -> Result<(), Error> {
        self.record("delete_repository_secret", name.to_string())
            .await
    }

    async fn get_environment_public_key(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
    ) -> Result<PublicKey, Error> {
        self.record("get_environment_public_key", environment.to_string())
            .await?;
        self.state
            .lock()
            .await
            .public_key
            .clone()
            .ok_or(Error::NotFound)
    }

    async fn list_environment_secrets(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
    ) -> Result<Vec<SecretSummary>, Error> {
        self.record("list_environment_secrets", environment.to_string())
            .await?;
        Ok(self
            .state
            .lock()
            .await
            .environment_secrets
            .get(environment)
            .cloned()
            .unwrap_or_default())
    }

    async fn put_environment_secret(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        name: &str,
        secret: &EncryptedSecret,
    ) -> Result<(), Error> {
        self.record(
            "put_environment_secret",
            format!("{} {}", environment, name),
        )
        .await?;
        self.state
            .lock()
            .await
            .secrets_written
            .push((name.to_string(), secret.clone()));
        Ok(())
    }

    async fn delete_environment_secret(
        &self,
        _owner: &str,
        _repo: &str,
        environment: &str,
        name: &str,
    ) -> Result<(), Error> {
        self.record(
            "delete_environment_secret",
            format!("{} {}", environment, name),
        )
        .await
    }

    async fn update_actions_permissions(
        &self,
        owner: &str,
        repo: &str,
        _permissions: &ActionsPermissions,
    ) -> Result<(), Error> {
        self.record("update_actions_permissions", format!("{}/{}", owner, repo))
            .await
    }

    async fn update_actions_access(
        &self,
        owner: &str,
        repo: &str,
        _access: &ActionsAccessPermissions,
    ) -> Result<(), Error> {
        self.record("update_actions_access", format!("{}/{}", owner, repo))
            .await
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error> {
        self.record("list_branches", format!("{}/{}", owner, repo))
            .await?;
        Ok(self
            .state
            .lock()
            .await
            .branches
            .iter()
            .map(|name| Branch { name: name.clone() })
            .collect())
    }

    async fn get_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, Error> {
        self.record("get_file", format!("{} {}", path, git_ref))
            .await?;
        self.state
            .lock()
            .await
            .files
            .get(path)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn put_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        content: &[u8],
        sha: Option<&str>,
        options: &CommitOptions,
    ) -> Result<CommitInfo, Error> {
        self.record("put_file", path.to_string()).await?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let new_sha = format!("sha-{}", state.next_id);
        state.files.insert(
            path.to_string(),
            RemoteFile {
                path: path.to_string(),
                sha: new_sha.clone(),
                content: content.to_vec(),
            },
        );
        state.files_written.push((
            path.to_string(),
            content.to_vec(),
            sha.map(str::to_string),
            options.clone(),
        ));
        Ok(CommitInfo {
            sha: Some(new_sha),
            html_url: None,
        })
    }

    async fn delete_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        sha: &str,
        options: &CommitOptions,
    ) -> Result<CommitInfo, Error> {
        self.record("delete_file", path.to_string()).await?;
        let mut state = self.state.lock().await;
        state.files.remove(path);
        state
            .files_deleted
            .push((path.to_string(), sha.to_string(), options.clone()));
        Ok(CommitInfo::default())
    }
}
