//! Storage trait definitions for the community document backends.

use crate::models::community::CommunityDocument;

use super::StorageError;

/// A community document paired with the opaque version token it was
/// read at. The token is required for a conditional write and is spent
/// after one use. `None` means the document does not exist yet and the
/// next write creates it.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub document: CommunityDocument,
    pub version_token: Option<String>,
}

/// Versioned blob store holding the single community document.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the current document and its version token. A missing
    /// document yields an empty document with no token.
    async fn read(&self) -> Result<DocumentHandle, StorageError>;

    /// Write the full document conditionally on `version_token`.
    /// `None` asserts the document does not exist yet; a stale or
    /// wrongly-absent token must be rejected with
    /// [`StorageError::VersionConflict`], never silently accepted.
    async fn write(
        &self,
        document: &CommunityDocument,
        version_token: Option<&str>,
        message: &str,
    ) -> Result<(), StorageError>;
}
