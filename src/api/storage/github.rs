//! GitHub-backed storage for the community document.
//!
//! The document lives as one JSON file in a repository, read and
//! written through the contents API. The file's blob SHA is the
//! version token: a write carrying a stale SHA is rejected by GitHub,
//! which is the only concurrency control this store relies on.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::info;

use crate::models::community::CommunityDocument;

use super::error::StorageError;
use super::traits::{DocumentHandle, DocumentStore};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_REPO: &str = "ai-mindset-org/aim-lms";
const DEFAULT_FILE_PATH: &str = "public/metaphors/community.json";
const DEFAULT_BRANCH: &str = "main";
const USER_AGENT: &str = "visual-metaphor-api";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Community document store backed by the GitHub contents API.
pub struct GitHubDocumentStore {
    client: Client,
    api_base: String,
    repo: String,
    token: String,
    file_path: String,
    branch: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

impl GitHubDocumentStore {
    pub fn new(
        api_base: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        file_path: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_base: api_base.into(),
            repo: repo.into(),
            token: token.into(),
            file_path: file_path.into(),
            branch: branch.into(),
        }
    }

    /// Build a store from environment configuration. Fails when the
    /// repository token is absent; everything else has defaults.
    pub fn from_env() -> Result<Self, StorageError> {
        let token = env::var("GITHUB_TOKEN")
            .map_err(|_| StorageError::NotConfigured("GitHub integration not configured".into()))?;
        let repo = env::var("GITHUB_REPO").unwrap_or_else(|_| DEFAULT_REPO.to_string());
        let api_base = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let file_path =
            env::var("COMMUNITY_FILE_PATH").unwrap_or_else(|_| DEFAULT_FILE_PATH.to_string());
        let branch = env::var("COMMUNITY_BRANCH").unwrap_or_else(|_| DEFAULT_BRANCH.to_string());
        Ok(Self::new(api_base, repo, token, file_path, branch))
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base, self.repo, self.file_path
        )
    }
}

#[async_trait::async_trait]
impl DocumentStore for GitHubDocumentStore {
    async fn read(&self) -> Result<DocumentHandle, StorageError> {
        let response = self
            .client
            .get(self.contents_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            // Document does not exist yet; it will be created on the
            // next write, which must carry no version token.
            return Ok(DocumentHandle {
                document: CommunityDocument::empty(),
                version_token: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api { status, body });
        }

        let data: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Decode(e.to_string()))?;

        // GitHub wraps base64 payloads with newlines
        let encoded: String = data.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| StorageError::Decode(e.to_string()))?;
        let document: CommunityDocument =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Decode(e.to_string()))?;

        Ok(DocumentHandle {
            document,
            version_token: Some(data.sha),
        })
    }

    async fn write(
        &self,
        document: &CommunityDocument,
        version_token: Option<&str>,
        message: &str,
    ) -> Result<(), StorageError> {
        let payload =
            serde_json::to_vec_pretty(document).map_err(|e| StorageError::Decode(e.to_string()))?;

        let mut body = json!({
            "message": message,
            "content": BASE64.encode(payload),
            "branch": self.branch,
        });
        // Only include the sha when updating an existing file; a
        // create must omit it entirely.
        if let Some(sha) = version_token {
            body["sha"] = json!(sha);
        }

        let response = self
            .client
            .put(self.contents_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("Committed community document update to {}", self.repo);
            return Ok(());
        }

        // 409: sha no longer matches; 422: sha missing for an existing
        // file (or present for a create). Both mean a concurrent writer
        // got there first.
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(StorageError::VersionConflict);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
