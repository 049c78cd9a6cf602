use std::io;

use config_manager::ConfigurationError;
use settings_sync_core::SyncError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that end a `settings-sync` invocation.
///
/// Failures of individual rules never surface here. They are logged and counted in the
/// run report while the run continues.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable GitHub credentials, or GitHub rejected them.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The configuration document is missing, malformed or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// The run was aborted before all elements were processed.
    #[error("Synchronization aborted: {0}")]
    Sync(#[from] SyncError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Sync(_) => 2,
            Error::Auth(_) | Error::Config(_) | Error::Io(_) => 1,
        }
    }
}
