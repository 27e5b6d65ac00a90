//! Storage error types for the community document backends.

use thiserror::Error;

/// Storage operation errors.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Conditional write rejected: the version token read earlier no
    /// longer matches the store's current revision.
    #[error("version conflict: the community document changed since it was read")]
    VersionConflict,
    /// Credential or repository location missing at process start.
    #[error("{0}")]
    NotConfigured(String),
    /// Remote store returned a non-success status.
    #[error("GitHub API error: {status} - {body}")]
    Api { status: u16, body: String },
    /// Network-level failure talking to the remote store.
    #[error("connection error: {0}")]
    Connection(String),
    /// Stored payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}
