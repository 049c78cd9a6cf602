//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with the GitHub API
//! through the github_client crate. Callers that reconcile remote state rely on
//! [`Error::NotFound`] to tell an absent resource apart from a failed request.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// This enum represents all possible error conditions when working with the GitHub API,
/// including authentication failures, API errors, rate limiting, and data processing issues.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.get_file("my-org", "my-repo", "README.md", "refs/heads/main").await {
///     Ok(file) => println!("Current sha: {}", file.sha),
///     Err(Error::NotFound) => println!("File does not exist yet"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A GitHub API request failed without a usable HTTP status.
    ///
    /// Typically a transport, URI or encoding failure inside the HTTP stack.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - GitHub App credentials are invalid or expired
    /// - The personal access token is rejected while building the client
    /// - The installation token for a GitHub App cannot be created
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitHub API request returns a 404 status code,
    /// indicating that the requested resource (file, ruleset, environment, etc.)
    /// does not exist or is not accessible with the current authentication.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// GitHub answered with a non-success status code.
    ///
    /// Carries the HTTP status and the message GitHub returned so that rule
    /// failures can be logged with the reason the write was refused.
    #[error("GitHub returned status {status}: {message}")]
    Request { status: u16, message: String },

    /// A content path resolved to something other than a regular file.
    ///
    /// Parameters: (path, kind) where kind is `dir`, `symlink` or `submodule`.
    #[error("Expected a file at '{path}' but found an element of type '{kind}'")]
    UnexpectedContentType { path: String, kind: String },

    /// File content came back in an encoding that cannot be decoded.
    #[error("Content of '{path}' has unsupported encoding '{encoding}'")]
    UnsupportedEncoding { path: String, encoding: String },
}

impl Error {
    /// Returns true when the error means "the resource does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
