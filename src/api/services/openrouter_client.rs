//! HTTP client for the OpenRouter chat-completions API.
//!
//! One call per invocation, no retry logic here; model fallback is the
//! orchestrator's responsibility.

use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const REFERER: &str = "https://aim-visual-toolkit.netlify.app";
const APP_TITLE: &str = "AIM Visual Toolkit";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure modes of a single chat-completion call.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Non-success HTTP status from the upstream API.
    #[error("upstream returned {status}: {body}")]
    Transport { status: u16, body: String },
    /// Network-level failure (connect, timeout).
    #[error("upstream request failed: {0}")]
    Network(String),
    /// HTTP succeeded but the response carried no message content.
    #[error("no content in upstream response")]
    NoContent,
}

impl InvokeError {
    /// Whether this failure qualifies for the fallback-model retry.
    /// A 2xx response with no usable content does not: a blind retry
    /// is assumed equally malformed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            InvokeError::Transport { .. } | InvokeError::Network(_)
        )
    }
}

/// Thin client over the chat-completions endpoint.
pub struct ChatClient {
    client: Client,
    api_url: String,
}

impl ChatClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Perform one chat-completion call and extract the first message's
    /// text content.
    pub async fn invoke(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        api_key: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, InvokeError> {
        let request_body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InvokeError::Transport { status, body });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        payload
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or(InvokeError::NoContent)
    }
}
