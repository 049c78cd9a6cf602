//! GitHub Actions settings and secrets types.
//!
//! See: https://docs.github.com/en/rest/actions/permissions
//! and https://docs.github.com/en/rest/actions/secrets

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;

/// Body for `PUT /repos/{owner}/{repo}/actions/permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ActionsPermissions {
    /// Whether GitHub Actions is enabled on the repository
    pub enabled: bool,

    /// Which actions and reusable workflows may run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_actions: Option<AllowedActions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllowedActions {
    All,
    LocalOnly,
    Selected,
}

/// Body for `PUT /repos/{owner}/{repo}/actions/permissions/access`.
///
/// Controls whether workflows outside the repository may use its actions and reusable
/// workflows. Only private and internal repositories support this setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ActionsAccessPermissions {
    pub access_level: AccessLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    None,
    User,
    Organization,
    Enterprise,
}

/// Public key used to encrypt secrets for a repository or environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Identifier sent alongside encrypted values
    pub key_id: String,

    /// Base64 encoded Curve25519 public key
    pub key: String,
}

/// A secret as listed by GitHub. Values are never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSummary {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecretList {
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub secrets: Vec<SecretSummary>,
}

/// Body for creating or updating a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptedSecret {
    /// Base64 encoded sealed box of the secret value
    pub encrypted_value: String,

    /// ID of the public key the value was sealed with
    pub key_id: String,
}
