//! GitHub credentials and client construction.
//!
//! A GitHub App installation takes precedence over a token when its ID is given. App
//! credentials must then be complete.

use std::path::PathBuf;

use clap::Args;
use github_client::{
    authenticate_with_access_token, create_app_client, create_token_client, GitHubClient,
};
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Token used to call the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// ID of the GitHub App to authenticate as
    #[arg(long, env = "GITHUB_APP_ID")]
    pub app_id: Option<u64>,

    /// PEM private key of the GitHub App
    #[arg(long, env = "GITHUB_APP_PRIVATE_KEY_FILE")]
    pub app_private_key_file: Option<PathBuf>,

    /// Installation of the GitHub App on the target owner
    #[arg(long, env = "GITHUB_APP_INSTALLATION_ID")]
    pub app_installation_id: Option<u64>,
}

/// Resolved credentials.
#[derive(Debug)]
pub enum Credentials {
    Token(SecretString),
    App {
        app_id: u64,
        private_key_file: PathBuf,
        installation_id: u64,
    },
}

impl Credentials {
    pub fn from_args(args: &CredentialArgs) -> Result<Self, Error> {
        if let Some(app_id) = args.app_id {
            let private_key_file = args.app_private_key_file.clone().ok_or_else(|| {
                Error::Auth("--app-private-key-file is required with --app-id".to_string())
            })?;
            let installation_id = args.app_installation_id.ok_or_else(|| {
                Error::Auth("--app-installation-id is required with --app-id".to_string())
            })?;
            return Ok(Credentials::App {
                app_id,
                private_key_file,
                installation_id,
            });
        }

        match args.token.as_deref() {
            Some(token) if !token.trim().is_empty() => {
                Ok(Credentials::Token(SecretString::from(token.to_string())))
            }
            _ => Err(Error::Auth(
                "No GitHub credentials: set --token or the GitHub App options".to_string(),
            )),
        }
    }
}

/// Builds an authenticated client, against `api_url` when given.
#[instrument(skip(credentials))]
pub async fn connect(credentials: &Credentials, api_url: Option<&str>) -> Result<GitHubClient, Error> {
    let octocrab = match credentials {
        Credentials::Token(token) => {
            debug!("Authenticating with a token");
            create_token_client(token, api_url).map_err(|e| Error::Auth(e.to_string()))?
        }
        Credentials::App {
            app_id,
            private_key_file,
            installation_id,
        } => {
            debug!(app_id, installation_id, "Authenticating as a GitHub App");
            let private_key = tokio::fs::read_to_string(private_key_file)
                .await
                .map_err(|e| {
                    Error::Auth(format!(
                        "Failed to read private key file {}: {}",
                        private_key_file.display(),
                        e
                    ))
                })?;
            let app = create_app_client(*app_id, &private_key, api_url)
                .await
                .map_err(|e| Error::Auth(e.to_string()))?;
            authenticate_with_access_token(&app, *installation_id)
                .await
                .map_err(|e| Error::Auth(e.to_string()))?
        }
    };

    Ok(GitHubClient::new(octocrab))
}
