//! Typed model of the settings synchronization document.
//!
//! A document is a list of [`Element`]s. Each element targets the repositories of one
//! owner and carries the desired state for any number of resource kinds. Element keys
//! use camelCase; GitHub payload objects nested inside keep GitHub's field names.
//!
//! ```yaml
//! elements:
//!   - name: platform services
//!     owner: my-org
//!     org: true
//!     searchType: property
//!     customPropertyName: team
//!     customPropertyValue: platform
//!     features:
//!       has_wiki: false
//!     deleteRulesets: [legacy]
//! ```

use github_client::{
    ActionsAccessPermissions, ActionsPermissions, BranchPolicyRequest, EnvironmentSettings,
    RepositoryFeatures, RepositoryRuleset,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

/// The whole configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Desired-state units, processed in order
    pub elements: Vec<Element>,
}

/// One desired-state unit scoped to an owner.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Element {
    /// Optional label used in logs
    #[serde(default)]
    pub name: Option<String>,

    /// Login of the user or organization owning the repositories
    pub owner: String,

    /// Whether `owner` is an organization
    #[serde(default)]
    pub org: bool,

    /// How repositories of the owner are selected
    pub search_type: SearchType,

    /// Custom property filtered on by `searchType: property`
    #[serde(default)]
    pub custom_property_name: Option<String>,

    /// Required property value. Without one, any repository matches.
    #[serde(default)]
    pub custom_property_value: Option<String>,

    /// Full names (`owner/name`) of repositories to leave alone
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub features: Option<RepositoryFeatures>,

    #[serde(default)]
    pub rulesets: Option<Vec<RepositoryRuleset>>,

    /// Names of rulesets to delete
    #[serde(default)]
    pub delete_rulesets: Option<Vec<String>>,

    #[serde(default)]
    pub environments: Option<Vec<EnvironmentDefinition>>,

    /// Names of environments to delete
    #[serde(default)]
    pub delete_environments: Option<Vec<String>>,

    #[serde(default)]
    pub files: Option<FilesOperation<FileMapping>>,

    #[serde(default)]
    pub merge_files: Option<FilesOperation<MergeFile>>,

    #[serde(default)]
    pub actions: Option<ActionsSettings>,
}

impl Element {
    /// Label for log output: the configured name, or the owner.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.owner)
    }

    /// The repository selection described by the search fields.
    ///
    /// A property search without `customPropertyName` yields an empty name, which the
    /// loader rejects.
    pub fn selection(&self) -> Selection<'_> {
        match self.search_type {
            SearchType::All => Selection::All,
            SearchType::Property => Selection::Property {
                name: self.custom_property_name.as_deref().unwrap_or_default(),
                value: self.custom_property_value.as_deref(),
            },
        }
    }
}

/// Value of an element's `searchType` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Every repository of the owner
    All,

    /// Repositories whose custom property matches
    Property,
}

/// Repository selection of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    All,
    Property { name: &'a str, value: Option<&'a str> },
}

/// A custom property condition. Without a value, any repository matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyCondition {
    pub custom_property_name: String,

    #[serde(default)]
    pub custom_property_value: Option<String>,
}

/// Desired state for one deployment environment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentDefinition {
    pub name: String,

    /// Environment settings sent on create or update
    #[serde(default)]
    pub definition: EnvironmentSettings,

    #[serde(default)]
    pub protection_rules: Option<Vec<ProtectionRule>>,

    #[serde(default)]
    pub branch_policies: Option<Vec<BranchPolicyRequest>>,

    #[serde(default)]
    pub secrets: Option<Vec<ActionSecret>>,

    /// All conditions must match for the environment to apply to a repository
    #[serde(default)]
    pub conditions: Vec<PropertyCondition>,
}

/// A custom deployment protection rule, keyed by the slug of its GitHub App.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ProtectionRule {
    pub slug: String,

    /// GitHub App integration ID used when enabling the rule
    pub integration_id: u64,
}

/// A secret to write, or to delete when no value is given.
#[derive(Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ActionSecret {
    pub name: String,

    #[serde(default)]
    pub value: Option<String>,
}

impl std::fmt::Debug for ActionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSecret")
            .field("name", &self.name)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Branch and committer settings shared by the file and merge-file operations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilesOperation<T> {
    /// Target branch, the repository default branch when absent
    #[serde(default)]
    pub branch_name: Option<String>,

    pub files: Vec<T>,

    #[serde(default)]
    pub committer: Option<CommitterOverride>,
}

/// Overrides for the commit identity. Missing fields keep the default identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CommitterOverride {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// A file copied from the local source tree. No source means the destination is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileMapping {
    #[serde(default)]
    pub source: Option<String>,

    pub destination: String,
}

/// A destination built by deep-merging conditioned sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MergeFile {
    pub destination: String,

    /// Output format of the destination
    #[serde(rename = "type")]
    pub format: FileFormat,

    /// Candidate sources, merged in order
    pub conditions: Vec<MergeSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MergeSource {
    pub custom_property_name: String,

    #[serde(default)]
    pub custom_property_value: Option<String>,

    pub source: String,

    #[serde(rename = "type")]
    pub format: FileFormat,
}

impl MergeSource {
    /// The custom property condition deciding whether this source is included.
    pub fn condition(&self) -> PropertyCondition {
        PropertyCondition {
            custom_property_name: self.custom_property_name.clone(),
            custom_property_value: self.custom_property_value.clone(),
        }
    }
}

/// Structured file format for merge-file sources and destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Yml,
    Yaml,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FileFormat::Json => "json",
            FileFormat::Yml => "yml",
            FileFormat::Yaml => "yaml",
        };
        f.write_str(text)
    }
}

/// GitHub Actions settings for the selected repositories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionsSettings {
    #[serde(default)]
    pub permissions: Option<ActionsPermissions>,

    #[serde(default)]
    pub access_permissions: Option<ActionsAccessPermissions>,

    #[serde(default)]
    pub secrets: Option<Vec<ActionSecret>>,
}
