//! In-memory document store used by tests and local development.
//!
//! Mirrors the conditional-write contract of the GitHub backend with a
//! monotonically increasing revision counter as the version token.

use std::sync::Mutex;

use crate::models::community::CommunityDocument;

use super::error::StorageError;
use super::traits::{DocumentHandle, DocumentStore};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<Option<(CommunityDocument, u64)>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn read(&self) -> Result<DocumentHandle, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(match state.as_ref() {
            Some((document, revision)) => DocumentHandle {
                document: document.clone(),
                version_token: Some(revision.to_string()),
            },
            None => DocumentHandle {
                document: CommunityDocument::empty(),
                version_token: None,
            },
        })
    }

    async fn write(
        &self,
        document: &CommunityDocument,
        version_token: Option<&str>,
        _message: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        let current_revision = state.as_ref().map(|(_, revision)| *revision);
        match current_revision {
            None => {
                if version_token.is_some() {
                    return Err(StorageError::VersionConflict);
                }
                *state = Some((document.clone(), 1));
            }
            Some(revision) => {
                if version_token != Some(revision.to_string().as_str()) {
                    return Err(StorageError::VersionConflict);
                }
                *state = Some((document.clone(), revision + 1));
            }
        }
        Ok(())
    }
}
