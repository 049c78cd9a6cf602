//! Repository contents domain types.
//!
//! This module contains types for reading a single file from a repository and for
//! committing file creations, updates and deletions through the Contents API.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// Type of entry in a repository directory.
///
/// Maps to GitHub's content type field in the Contents API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file
    File,

    /// Directory (can contain other entries)
    Dir,

    /// Symbolic link
    Symlink,

    /// Git submodule reference
    Submodule,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            EntryType::File => "file",
            EntryType::Dir => "dir",
            EntryType::Symlink => "symlink",
            EntryType::Submodule => "submodule",
        };
        f.write_str(text)
    }
}

/// A file read from a repository, with its content already decoded.
///
/// The `sha` is the blob hash GitHub expects back when the file is updated or
/// deleted, so a write fails if the file changed after it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Path of the file within the repository
    pub path: String,

    /// Blob SHA of the current content
    pub sha: String,

    /// Decoded file content
    pub content: Vec<u8>,
}

/// Single-entry response of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentResponse {
    /// Returns true when GitHub left the content out of the response.
    ///
    /// Files between 1 and 100 MB are listed with `encoding: none` and an empty
    /// `content`; their bytes must be read from the Git blob instead.
    pub(crate) fn content_omitted(&self) -> bool {
        self.encoding.as_deref() == Some("none")
    }

    /// Replaces the content with the one read from the file's blob.
    pub(crate) fn with_blob(self, blob: BlobResponse) -> Self {
        Self {
            content: Some(blob.content),
            encoding: Some(blob.encoding),
            ..self
        }
    }

    /// Converts the response into a [`RemoteFile`], decoding the payload.
    pub(crate) fn into_remote_file(self) -> Result<RemoteFile, Error> {
        if self.entry_type != EntryType::File {
            return Err(Error::UnexpectedContentType {
                path: self.path,
                kind: self.entry_type.to_string(),
            });
        }

        let raw = self.content.unwrap_or_default();
        let content = match self.encoding.as_deref() {
            Some("base64") | None => decode_base64(&raw)?,
            Some("utf-8") => raw.into_bytes(),
            Some(other) => {
                return Err(Error::UnsupportedEncoding {
                    path: self.path,
                    encoding: other.to_string(),
                })
            }
        };

        Ok(RemoteFile {
            path: self.path,
            sha: self.sha,
            content,
        })
    }
}

/// Response of `GET /repos/{owner}/{repo}/git/blobs/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BlobResponse {
    pub content: String,
    pub encoding: String,
}

/// GitHub wraps base64 payloads every 60 characters.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, Error> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| Error::InvalidResponse)
}

/// Identity used for commits created by the contents API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Commit metadata for a single file write or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    /// Commit message
    pub message: String,

    /// Branch the commit is created on
    pub branch: String,

    /// Committer identity
    pub committer: Committer,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileWriteRequest<'a> {
    pub message: &'a str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    pub branch: &'a str,
    pub committer: &'a Committer,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileDeleteRequest<'a> {
    pub message: &'a str,
    pub sha: &'a str,
    pub branch: &'a str,
    pub committer: &'a Committer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileCommitResponse {
    pub commit: CommitInfo,
}

/// The commit created by a file write or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    #[serde(default)]
    pub sha: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,
}

/// A branch of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
}
