//! Error types raised while reconciling repositories.
//!
//! Only [`SyncError::RepositoryListing`] ends a run. Every other variant is raised by a
//! single rule and caught at the rule boundary by the synchronizer.

use config_manager::FileFormat;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum SyncError {
    /// A call to GitHub failed.
    #[error(transparent)]
    GitHub(#[from] github_client::Error),

    /// Repositories of an owner could not be listed.
    #[error("Failed to list repositories of '{owner}': {source}")]
    RepositoryListing {
        owner: String,
        #[source]
        source: github_client::Error,
    },

    #[error("File {path} not found")]
    SourceNotFound { path: String },

    #[error("Failed to read source file {path}: {reason}")]
    SourceRead { path: String, reason: String },

    #[error("Failed to parse {path} as {format}: {message}")]
    SourceParse {
        path: String,
        format: FileFormat,
        message: String,
    },

    #[error("Failed to serialize merged document to {format}: {message}")]
    Serialize { format: FileFormat, message: String },

    #[error("Branch {branch} does not exist on {repository}")]
    BranchNotFound { branch: String, repository: String },

    /// The public key returned by GitHub is not a valid sealed-box key.
    #[error("Invalid public key '{key_id}': {reason}")]
    InvalidPublicKey { key_id: String, reason: String },

    #[error("Failed to encrypt secret '{name}'")]
    Encryption { name: String },
}

pub type SyncResult<T> = Result<T, SyncError>;
