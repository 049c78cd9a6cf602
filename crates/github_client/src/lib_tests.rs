//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(mock_server: &MockServer) -> GitHubClient {
    let octocrab = octocrab::Octocrab::builder()
        .base_uri(mock_server.uri())
        .unwrap()
        .personal_token("test-token".to_string())
        .build()
        .unwrap();
    GitHubClient { client: octocrab }
}

fn repo_json(owner: &str, owner_type: &str, name: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "private": false,
        "archived": false,
        "visibility": "public",
        "default_branch": "main",
        "html_url": format!("https://github.com/{owner}/{name}"),
        "owner": { "login": owner, "type": owner_type }
    })
}

fn committer() -> Committer {
    Committer {
        name: "github-actions[bot]".to_string(),
        email: "github-actions[bot]@users.noreply.github.com".to_string(),
    }
}

// ============================================================================
// Path helpers
// ============================================================================

#[test]
fn test_api_path_joins_segments() {
    assert_eq!(
        api_path(&["repos", "my-org", "repo", "rulesets", "42"]).unwrap(),
        "/repos/my-org/repo/rulesets/42"
    );
}

#[test]
fn test_api_path_encodes_segments() {
    let path = api_path(&["repos", "o", "r", "environments", "prod/eu west"]).unwrap();
    assert_eq!(path, "/repos/o/r/environments/prod%2Feu%20west");
}

#[test]
fn test_contents_path_keeps_directory_separators() {
    assert_eq!(
        contents_path("o", "r", ".github/workflows/ci.yml").unwrap(),
        "/repos/o/r/contents/.github/workflows/ci.yml"
    );
    assert_eq!(
        contents_path("o", "r", "/README.md").unwrap(),
        "/repos/o/r/contents/README.md"
    );
}

// ============================================================================
// Repository listing
// ============================================================================

#[tokio::test]
async fn test_list_repositories_for_organization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/my-org"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"login": "my-org", "plan": {"name": "team"}})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgs/my-org/repos"))
        .and(query_param("sort", "full_name"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("my-org", "Organization", "alpha"),
            repo_json("my-org", "Organization", "beta"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/my-org/alpha/properties/values"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"property_name": "team", "value": "platform"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/my-org/beta/properties/values"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let repositories = client.list_repositories("my-org", true).await.unwrap();

    assert_eq!(repositories.len(), 2);
    assert_eq!(repositories[0].full_name, "my-org/alpha");
    assert_eq!(repositories[0].plan, "team");
    assert_eq!(
        repositories[0].properties,
        vec![CustomPropertyAssignment {
            property_name: "team".to_string(),
            value: Some(CustomPropertyValue::Single("platform".to_string())),
        }]
    );
    assert!(repositories[1].properties.is_empty());
}

#[tokio::test]
async fn test_list_repositories_for_user_skips_properties() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/someone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "someone"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/someone/repos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo_json("someone", "User", "dotfiles")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/someone/dotfiles/properties/values"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let repositories = client.list_repositories("someone", false).await.unwrap();

    assert_eq!(repositories.len(), 1);
    assert_eq!(repositories[0].plan, FREE_PLAN);
    assert_eq!(repositories[0].owner_type, "User");
}

#[tokio::test]
async fn test_list_repositories_follows_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/someone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"plan": {"name": "pro"}})))
        .mount(&mock_server)
        .await;

    let first_page: Vec<serde_json::Value> = (0..100)
        .map(|i| repo_json("someone", "User", &format!("repo-{i:03}")))
        .collect();
    Mock::given(method("GET"))
        .and(path("/users/someone/repos"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(first_page)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/someone/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo_json("someone", "User", "zeta")])),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let repositories = client.list_repositories("someone", false).await.unwrap();

    assert_eq!(repositories.len(), 101);
    assert_eq!(repositories[100].name, "zeta");
}

#[tokio::test]
async fn test_list_repositories_propagates_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/missing-org"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_repositories("missing-org", true).await;

    assert!(matches!(result, Err(Error::NotFound)));
}

// ============================================================================
// Settings writes
// ============================================================================

#[tokio::test]
async fn test_update_repository_features_sends_only_set_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/o/r"))
        .and(body_json(json!({"has_wiki": false, "allow_auto_merge": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "r"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let features = RepositoryFeatures {
        has_wiki: Some(false),
        allow_auto_merge: Some(true),
        ..Default::default()
    };

    client
        .update_repository_features("o", "r", &features)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_actions_permissions_accepts_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/actions/permissions"))
        .and(body_json(json!({"enabled": true, "allowed_actions": "selected"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let permissions = ActionsPermissions {
        enabled: true,
        allowed_actions: Some(AllowedActions::Selected),
    };

    client
        .update_actions_permissions("o", "r", &permissions)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_actions_access_maps_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/actions/permissions/access"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let access = ActionsAccessPermissions {
        access_level: AccessLevel::User,
    };

    let error = client
        .update_actions_access("o", "r", &access)
        .await
        .unwrap_err();

    match error {
        Error::Request { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("Expected Request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_is_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/rulesets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for installation ID 1.",
            "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_rulesets("o", "r").await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}

// ============================================================================
// Rulesets
// ============================================================================

#[tokio::test]
async fn test_list_rulesets_excludes_parent_rulesets() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/rulesets"))
        .and(query_param("includes_parents", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "main", "source": "o/r", "source_type": "Repository"}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let rulesets = client.list_rulesets("o", "r").await.unwrap();

    assert_eq!(rulesets.len(), 1);
    assert_eq!(rulesets[0].id, 7);
}

#[tokio::test]
async fn test_create_and_update_ruleset() {
    let mock_server = MockServer::start().await;

    let ruleset = RepositoryRuleset {
        name: "main".to_string(),
        target: Some(RulesetTarget::Branch),
        enforcement: RulesetEnforcement::Active,
        bypass_actors: None,
        conditions: None,
        rules: vec![Rule::Deletion],
    };

    Mock::given(method("POST"))
        .and(path("/repos/o/r/rulesets"))
        .and(body_partial_json(json!({"name": "main", "rules": [{"type": "deletion"}]})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 11, "name": "main", "enforcement": "active"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/rulesets/11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 11, "name": "main"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let created = client.create_ruleset("o", "r", &ruleset).await.unwrap();
    assert_eq!(created.id, 11);

    let updated = client.update_ruleset("o", "r", 11, &ruleset).await.unwrap();
    assert_eq!(updated.name, "main");
}

#[tokio::test]
async fn test_delete_ruleset_accepts_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/o/r/rulesets/11"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.delete_ruleset("o", "r", 11).await.unwrap();
}

// ============================================================================
// Environments
// ============================================================================

#[tokio::test]
async fn test_list_environments_unwraps_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "environments": [{"id": 1, "name": "staging"}, {"id": 2, "name": "production"}]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let environments = client.list_environments("o", "r").await.unwrap();

    let names: Vec<&str> = environments.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["staging", "production"]);
}

#[tokio::test]
async fn test_create_or_update_environment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/environments/production"))
        .and(body_json(json!({"wait_timer": 5})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 9, "name": "production"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let settings = EnvironmentSettings {
        wait_timer: Some(5),
        ..Default::default()
    };

    let environment = client
        .create_or_update_environment("o", "r", "production", &settings)
        .await
        .unwrap();

    assert_eq!(environment.id, 9);
}

#[tokio::test]
async fn test_protection_rule_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/environments/prod/deployment_protection_rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "custom_deployment_protection_rules": [
                {"id": 3, "enabled": true, "app": {"id": 1, "slug": "gate"}}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/o/r/environments/prod/deployment_protection_rules"))
        .and(body_json(json!({"integration_id": 5})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 4, "enabled": true, "app": {"id": 5, "slug": "other"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/o/r/environments/prod/deployment_protection_rules/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let rules = client.list_protection_rules("o", "r", "prod").await.unwrap();
    assert_eq!(rules[0].app.slug, "gate");

    let created = client
        .create_protection_rule("o", "r", "prod", &ProtectionRuleRequest { integration_id: 5 })
        .await
        .unwrap();
    assert_eq!(created.app.slug, "other");

    client
        .disable_protection_rule("o", "r", "prod", 3)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_branch_policy_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/environments/prod/deployment-branch-policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "branch_policies": [{"id": 361471, "name": "release/*", "type": "branch"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/o/r/environments/prod/deployment-branch-policies"))
        .and(body_json(json!({"name": "v*", "type": "tag"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "v*", "type": "tag"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/o/r/environments/prod/deployment-branch-policies/361471"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let policies = client.list_branch_policies("o", "r", "prod").await.unwrap();
    assert_eq!(policies[0].name.as_deref(), Some("release/*"));

    let request = BranchPolicyRequest {
        name: "v*".to_string(),
        policy_type: BranchPolicyType::Tag,
    };
    client
        .create_branch_policy("o", "r", "prod", &request)
        .await
        .unwrap();

    client
        .delete_branch_policy("o", "r", "prod", 361471)
        .await
        .unwrap();
}

// ============================================================================
// Secrets
// ============================================================================

#[tokio::test]
async fn test_repository_secret_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/actions/secrets/public-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key_id": "012345678912345678",
            "key": "2Sg8iYjAxxmI2LvUXpJjkYrMxURPc8r+dB7TJyvv1234"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/actions/secrets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "secrets": [{"name": "GH_TOKEN"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/actions/secrets/GH_TOKEN"))
        .and(body_json(json!({"encrypted_value": "c2VhbGVk", "key_id": "012345678912345678"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/o/r/actions/secrets/OLD"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let key = client.get_repository_public_key("o", "r").await.unwrap();
    assert_eq!(key.key_id, "012345678912345678");

    let secrets = client.list_repository_secrets("o", "r").await.unwrap();
    assert_eq!(secrets[0].name, "GH_TOKEN");

    let secret = EncryptedSecret {
        encrypted_value: "c2VhbGVk".to_string(),
        key_id: key.key_id,
    };
    client
        .put_repository_secret("o", "r", "GH_TOKEN", &secret)
        .await
        .unwrap();

    client
        .delete_repository_secret("o", "r", "OLD")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_environment_secret_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/environments/prod/secrets/public-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key_id": "1", "key": "a2V5"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/environments/prod/secrets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_count": 0, "secrets": []})))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/environments/prod/secrets/DEPLOY_KEY"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/o/r/environments/prod/secrets/DEPLOY_KEY"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let key = client
        .get_environment_public_key("o", "r", "prod")
        .await
        .unwrap();
    assert!(client
        .list_environment_secrets("o", "r", "prod")
        .await
        .unwrap()
        .is_empty());

    let secret = EncryptedSecret {
        encrypted_value: "c2VhbGVk".to_string(),
        key_id: key.key_id,
    };
    client
        .put_environment_secret("o", "r", "prod", "DEPLOY_KEY", &secret)
        .await
        .unwrap();
    client
        .delete_environment_secret("o", "r", "prod", "DEPLOY_KEY")
        .await
        .unwrap();
}

// ============================================================================
// Contents
// ============================================================================

#[tokio::test]
async fn test_get_file_decodes_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/.github/CODEOWNERS"))
        .and(query_param("ref", "refs/heads/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "encoding": "base64",
            "path": ".github/CODEOWNERS",
            "sha": "abc123",
            "content": "KiBAbXktb3JnL3Bs\nYXRmb3JtCg==\n"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let file = client
        .get_file("o", "r", ".github/CODEOWNERS", "refs/heads/main")
        .await
        .unwrap();

    assert_eq!(file.sha, "abc123");
    assert_eq!(file.content, b"* @my-org/platform\n");
}

#[tokio::test]
async fn test_get_file_reads_large_files_from_blob() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/data/big.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "encoding": "none",
            "path": "data/big.json",
            "sha": "b10b",
            "size": 2097152,
            "content": ""
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/git/blobs/b10b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "b10b",
            "size": 3,
            "encoding": "base64",
            "content": "e30K\n"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let file = client
        .get_file("o", "r", "data/big.json", "refs/heads/main")
        .await
        .unwrap();

    assert_eq!(file.path, "data/big.json");
    assert_eq!(file.sha, "b10b");
    assert_eq!(file.content, b"{}\n");
}

#[tokio::test]
async fn test_get_file_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/missing.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .get_file("o", "r", "missing.txt", "refs/heads/main")
        .await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_get_file_on_directory_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "file", "name": "index.md", "path": "docs/index.md", "sha": "1"}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_file("o", "r", "docs", "refs/heads/main").await;

    match result {
        Err(Error::UnexpectedContentType { path, kind }) => {
            assert_eq!(path, "docs");
            assert_eq!(kind, "dir");
        }
        other => panic!("Expected UnexpectedContentType, got {:?}", other),
    }
}

#[tokio::test]
async fn test_put_file_encodes_content_and_sends_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/o/r/contents/config/app.json"))
        .and(body_json(json!({
            "message": "Update",
            "content": "eyJhIjoxfQ==",
            "sha": "old-sha",
            "branch": "main",
            "committer": {
                "name": "github-actions[bot]",
                "email": "github-actions[bot]@users.noreply.github.com"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": {"sha": "new-sha"},
            "commit": {"sha": "c0ffee", "html_url": "https://github.com/o/r/commit/c0ffee"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = CommitOptions {
        message: "Update".to_string(),
        branch: "main".to_string(),
        committer: committer(),
    };

    let commit = client
        .put_file("o", "r", "config/app.json", br#"{"a":1}"#, Some("old-sha"), &options)
        .await
        .unwrap();

    assert_eq!(commit.sha.as_deref(), Some("c0ffee"));
}

#[tokio::test]
async fn test_delete_file_sends_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/o/r/contents/obsolete.txt"))
        .and(body_partial_json(json!({"sha": "abc123", "branch": "develop"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": null,
            "commit": {"sha": "d00d", "html_url": "https://github.com/o/r/commit/d00d"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = CommitOptions {
        message: "Remove".to_string(),
        branch: "develop".to_string(),
        committer: committer(),
    };

    let commit = client
        .delete_file("o", "r", "obsolete.txt", "abc123", &options)
        .await
        .unwrap();

    assert_eq!(commit.html_url.as_deref(), Some("https://github.com/o/r/commit/d00d"));
}

#[tokio::test]
async fn test_list_branches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "main", "protected": true},
            {"name": "develop", "protected": false}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let branches = client.list_branches("o", "r").await.unwrap();

    assert_eq!(branches.len(), 2);
    assert_eq!(branches[1].name, "develop");
}

// ============================================================================
// Client construction
// ============================================================================

#[tokio::test]
async fn test_create_token_client_with_base_uri() {
    let token = SecretString::from("ghp_test".to_string());
    let result = create_token_client(&token, Some("https://github.example.com/api/v3"));

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_app_client_rejects_invalid_key() {
    let result = create_app_client(123, "not a pem key", None).await;

    assert!(matches!(result, Err(Error::AuthError(_))));
}
