//! Community gallery service: the append-only update protocol for the
//! shared document.

use std::sync::Arc;
use tracing::{info, warn};

use crate::models::community::CommunityMetaphor;
use crate::storage::{DocumentStore, GitHubDocumentStore, StorageError};

/// Validated input for one community save.
#[derive(Debug, Clone)]
pub struct NewMetaphor {
    pub title: String,
    pub title_en: String,
    pub prompt: String,
    pub svg: String,
    pub author: String,
}

/// Appends entries to the community document through a versioned store.
pub struct CommunityService {
    store: Option<Arc<dyn DocumentStore>>,
}

impl CommunityService {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    /// Build a service over the GitHub store from environment
    /// configuration. A missing token leaves the service unconfigured;
    /// saves then fail with [`StorageError::NotConfigured`].
    pub fn from_env() -> Self {
        match GitHubDocumentStore::from_env() {
            Ok(store) => Self::new(Some(Arc::new(store))),
            Err(err) => {
                warn!("Community store not configured: {}", err);
                Self::new(None)
            }
        }
    }

    /// Read-mutate-write append: read the current document and its
    /// version token, prepend a freshly-constructed entry, and write
    /// back conditionally on that token. A concurrent writer surfaces
    /// as [`StorageError::VersionConflict`]; there is no automatic
    /// retry.
    pub async fn append(&self, new: NewMetaphor) -> Result<String, StorageError> {
        let store = self.store.as_ref().ok_or_else(|| {
            StorageError::NotConfigured("GitHub integration not configured".into())
        })?;

        let mut handle = store.read().await?;

        let entry =
            CommunityMetaphor::new(&new.title, &new.title_en, &new.prompt, &new.svg, &new.author);
        let id = entry.id.clone();
        let message = format!(
            "feat(metaphors): add \"{}\" by {}",
            entry.title_en, entry.author
        );
        handle.document.prepend(entry);

        store
            .write(&handle.document, handle.version_token.as_deref(), &message)
            .await?;

        info!("Saved community metaphor {}", id);
        Ok(id)
    }
}
