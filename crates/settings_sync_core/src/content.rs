//! Desired content of synchronized files.
//!
//! Plain file mappings copy a local source. Merge files combine every source whose
//! custom property condition matches the repository into one structured document.

use config_manager::{FileFormat, FileMapping, MergeFile};
use github_client::RepositoryMetadata;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::errors::{SyncError, SyncResult};
use crate::property::matches_condition;

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;

/// Reads file sources relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileContentResolver {
    source_root: PathBuf,
}

impl FileContentResolver {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    /// Content for a plain file mapping, or `None` when the destination must be removed.
    pub async fn resolve_file(&self, file: &FileMapping) -> SyncResult<Option<Vec<u8>>> {
        match &file.source {
            Some(source) => self.read_source(source).await.map(Some),
            None => Ok(None),
        }
    }

    /// Merged content for `file` on `repository`, or `None` when no source applies.
    pub async fn resolve_merge_file(
        &self,
        file: &MergeFile,
        repository: &RepositoryMetadata,
    ) -> SyncResult<Option<Vec<u8>>> {
        let mut documents = Vec::new();
        for source in &file.conditions {
            if !matches_condition(&repository.properties, &source.condition()) {
                debug!(source = %source.source, "Merge source condition not met");
                continue;
            }

            let content = self.read_source(&source.source).await?;
            if content.is_empty() {
                debug!(source = %source.source, "Merge source is empty");
                continue;
            }

            documents.push(parse_document(&content, source.format, &source.source)?);
        }

        let mut documents = documents.into_iter();
        let Some(mut merged) = documents.next() else {
            return Ok(None);
        };
        for document in documents {
            deep_merge(&mut merged, document);
        }

        serialize_document(&merged, file.format).map(Some)
    }

    async fn read_source(&self, source: &str) -> SyncResult<Vec<u8>> {
        let path = self.source_root.join(source);
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SyncError::SourceNotFound {
                path: source.to_string(),
            }),
            Err(e) => Err(SyncError::SourceRead {
                path: source.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Parses a JSON or YAML document.
pub fn parse_document(content: &[u8], format: FileFormat, path: &str) -> SyncResult<Value> {
    let parse_error = |message: String| SyncError::SourceParse {
        path: path.to_string(),
        format,
        message,
    };

    match format {
        FileFormat::Json => {
            serde_json::from_slice(content).map_err(|e| parse_error(e.to_string()))
        }
        FileFormat::Yml | FileFormat::Yaml => {
            serde_yaml::from_slice(content).map_err(|e| parse_error(e.to_string()))
        }
    }
}

/// Serializes a document. JSON uses four-space indentation without a trailing newline.
pub fn serialize_document(document: &Value, format: FileFormat) -> SyncResult<Vec<u8>> {
    let serialize_error = |message: String| SyncError::Serialize { format, message };

    match format {
        FileFormat::Json => {
            let mut buffer = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            document
                .serialize(&mut serializer)
                .map_err(|e| serialize_error(e.to_string()))?;
            Ok(buffer)
        }
        FileFormat::Yml | FileFormat::Yaml => serde_yaml::to_string(document)
            .map(String::into_bytes)
            .map_err(|e| serialize_error(e.to_string())),
    }
}

/// Merges `source` into `target`.
///
/// Arrays are extended with the source elements, or with the source value itself when it
/// is not an array. Objects merge key by key. Any other pairing takes the source value.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Array(items), Value::Array(more)) => items.extend(more),
        (Value::Array(items), value) => items.push(value),
        (Value::Object(fields), Value::Object(more)) => {
            for (key, value) in more {
                match fields.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        fields.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
