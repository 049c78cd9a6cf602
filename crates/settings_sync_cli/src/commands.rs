//! Implementations of the `settings-sync` subcommands.
//!
//! - `sync`: load the configuration, connect to GitHub and reconcile every element
//! - `validate`: load and validate the configuration only
//! - `schema`: print the JSON schema of the configuration document

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use config_manager::{configuration_schema, load_configuration, Configuration, DEFAULT_CONFIG_PATH};
use github_client::RepositoryClient;
use settings_sync_core::{FileContentResolver, RunContext, SettingsSynchronizer, SyncReport};
use tracing::{info, instrument, warn};

use crate::credentials::{connect, CredentialArgs, Credentials};
use crate::errors::Error;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path of the configuration document
    #[arg(long, env = "SETTINGS_SYNC_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Directory that file sources are resolved against
    #[arg(long, default_value = ".")]
    pub source_root: PathBuf,

    /// Base URL of the GitHub API, for GitHub Enterprise Server
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,
}

/// Loads and validates the configuration document.
#[instrument(skip_all, fields(config = %args.config.display()))]
pub fn validate(args: &ConfigArgs) -> Result<Configuration, Error> {
    let configuration = load_configuration(&args.config)?;
    info!(
        elements = configuration.elements.len(),
        "Configuration read successfully, got {} elements",
        configuration.elements.len()
    );
    Ok(configuration)
}

/// Writes the configuration JSON schema to `out`.
pub fn schema(out: &mut impl Write) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *out, &configuration_schema())
        .map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Runs a full synchronization.
///
/// Configuration and credentials are checked before any GitHub call is made.
pub async fn sync(args: &SyncArgs) -> Result<SyncReport, Error> {
    let configuration = validate(&args.config)?;
    let credentials = Credentials::from_args(&args.credentials)?;
    let client = connect(&credentials, args.api_url.as_deref()).await?;

    run(
        &configuration,
        Arc::new(client),
        FileContentResolver::new(args.source_root.clone()),
    )
    .await
}

/// Runs the synchronizer with an already connected client and logs the summary.
pub async fn run(
    configuration: &Configuration,
    client: Arc<dyn RepositoryClient>,
    resolver: FileContentResolver,
) -> Result<SyncReport, Error> {
    let synchronizer = SettingsSynchronizer::new(client, resolver, RunContext::from_env());
    let report = synchronizer.run(configuration).await?;
    log_summary(&report);
    Ok(report)
}

fn log_summary(report: &SyncReport) {
    info!(
        elements = report.elements,
        repositories = report.repositories,
        applied = report.applied,
        not_configured = report.not_configured,
        ineligible = report.ineligible,
        failed = report.failed,
        "Processed {} repositories",
        report.repositories
    );
    if !report.has_failures() {
        return;
    }
    for failure in &report.failures {
        warn!(
            repository = %failure.repository,
            rule = %failure.rule,
            "Step '{}' failed on {}: {}",
            failure.rule,
            failure.repository,
            failure.message
        );
    }
    warn!(failed = report.failed, "{} steps finished with an error", report.failed);
}
