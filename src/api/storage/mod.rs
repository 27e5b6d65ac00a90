//! Storage module for the community document.
//!
//! Provides versioned document store backends: GitHub-backed for
//! production and in-memory for tests and local development.

pub mod error;
pub mod traits;

// Store backend implementations
pub mod github;
pub mod memory;

pub use error::StorageError;
pub use github::GitHubDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentHandle, DocumentStore};
