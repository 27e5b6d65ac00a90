//! Generation orchestrator: prompt building, model fallback, SVG
//! extraction, and the best-effort title sub-call.

use regex::Regex;
use serde::Deserialize;
use std::env;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::generation::GenerateRequest;
use crate::services::openrouter_client::{ChatClient, DEFAULT_API_URL, InvokeError};
use crate::services::prompt_service;

/// Default primary model.
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";
/// Default fallback model, tried once after a transport failure.
pub const DEFAULT_FALLBACK_MODEL: &str = "google/gemini-2.5-flash";

const SVG_MAX_TOKENS: u32 = 4096;
const SVG_TEMPERATURE: f32 = 0.7;
const TITLE_MAX_TOKENS: u32 = 200;
const TITLE_TEMPERATURE: f32 = 0.3;

/// Generation failures surfaced to the HTTP boundary.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Concept text outside its length bounds. Checked before any
    /// network call.
    #[error("{0}")]
    InvalidInput(String),
    /// Neither a caller credential nor a server credential available.
    #[error("Server configuration error")]
    NoCredential,
    /// Primary and fallback attempts both failed at the HTTP layer.
    #[error("AI service temporarily unavailable")]
    UpstreamUnavailable,
    /// Upstream answered 2xx with no extractable message content.
    #[error("No content in AI response")]
    NoContent,
    /// Message content present but no SVG root-element span in it.
    #[error("AI did not return valid SVG")]
    NoSvgFound,
}

/// Localized + canonical short titles, each at most two words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePair {
    pub title: String,
    pub title_en: String,
}

/// Result of one successful generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub svg: String,
    /// Whichever model actually produced the document.
    pub model: String,
    pub elapsed_ms: u64,
    /// `None` whenever the naming sub-call failed; never an error.
    pub titles: Option<TitlePair>,
}

/// Orchestrates the generate pipeline over the chat client.
pub struct GenerationService {
    client: ChatClient,
    default_model: String,
    fallback_model: String,
    api_key: Option<String>,
}

impl GenerationService {
    pub fn new(
        client: ChatClient,
        default_model: impl Into<String>,
        fallback_model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            default_model: default_model.into(),
            fallback_model: fallback_model.into(),
            api_key,
        }
    }

    /// Build a service from environment configuration. A missing
    /// credential is tolerated here; requests without a caller-supplied
    /// key will fail with [`GenerationError::NoCredential`].
    pub fn from_env() -> Self {
        let api_key = env::var("OPENROUTER_API_KEY").ok();
        if api_key.is_none() {
            warn!("OpenRouter API key not configured");
        }
        let api_url = env::var("OPENROUTER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let default_model =
            env::var("GENERATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let fallback_model =
            env::var("FALLBACK_MODEL").unwrap_or_else(|_| DEFAULT_FALLBACK_MODEL.to_string());

        Self::new(ChatClient::new(api_url), default_model, fallback_model, api_key)
    }

    /// Run the full generation pipeline for one request.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        request
            .validate()
            .map_err(GenerationError::InvalidInput)?;

        let api_key = request
            .api_key
            .clone()
            .or_else(|| self.api_key.clone())
            .ok_or(GenerationError::NoCredential)?;

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let system = prompt_service::system_prompt(request.style, request.complexity, request.animation);
        let user = prompt_service::user_prompt(&request.text, request.complexity, request.animation);

        let started = Instant::now();
        let (content, used_model) = self
            .invoke_with_fallback(&model, &system, &user, &api_key)
            .await?;

        let svg = extract_svg(&content).ok_or_else(|| {
            let preview: String = content.chars().take(200).collect();
            warn!("No SVG in upstream response: {}", preview);
            GenerationError::NoSvgFound
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!("Generated metaphor in {}ms with {}", elapsed_ms, used_model);

        let titles = self.generate_titles(&request.text, &used_model, &api_key).await;

        Ok(GenerationOutcome {
            svg,
            model: used_model,
            elapsed_ms,
            titles,
        })
    }

    /// Try each candidate model in order and return the first success
    /// (content, model) or the mapped failure of the last attempt.
    /// Only transport-level failures advance to the next candidate; a
    /// request already targeting the fallback model gets one attempt.
    async fn invoke_with_fallback(
        &self,
        model: &str,
        system: &str,
        user: &str,
        api_key: &str,
    ) -> Result<(String, String), GenerationError> {
        let mut candidates = vec![model.to_string()];
        if model != self.fallback_model {
            candidates.push(self.fallback_model.clone());
        }
        let last = candidates.len() - 1;

        for (attempt, candidate) in candidates.iter().enumerate() {
            match self
                .client
                .invoke(candidate, system, user, api_key, SVG_MAX_TOKENS, SVG_TEMPERATURE)
                .await
            {
                Ok(content) => return Ok((content, candidate.clone())),
                Err(err) if err.is_transport() && attempt < last => {
                    warn!(
                        "Model {} failed ({}), trying fallback model {}",
                        candidate, err, self.fallback_model
                    );
                }
                Err(err) => {
                    warn!("Model {} failed: {}", candidate, err);
                    return Err(match err {
                        InvokeError::NoContent => GenerationError::NoContent,
                        _ => GenerationError::UpstreamUnavailable,
                    });
                }
            }
        }

        Err(GenerationError::UpstreamUnavailable)
    }

    /// Naming sub-call. Best-effort by contract: every failure mode
    /// degrades to `None`, never to an error of the parent request.
    async fn generate_titles(&self, text: &str, model: &str, api_key: &str) -> Option<TitlePair> {
        let user = prompt_service::title_user_prompt(text);
        let content = match self
            .client
            .invoke(
                model,
                prompt_service::TITLE_SYSTEM_PROMPT,
                &user,
                api_key,
                TITLE_MAX_TOKENS,
                TITLE_TEMPERATURE,
            )
            .await
        {
            Ok(content) => content,
            Err(err) => {
                warn!("Title generation failed: {}", err);
                return None;
            }
        };

        let fallback = prompt_service::derive_title_from_text(text);
        parse_titles(&content, &fallback)
    }
}

/// Extract the first SVG root-element span from raw model output.
/// Non-greedy, so surrounding prose or markdown fencing never leaks in.
pub fn extract_svg(content: &str) -> Option<String> {
    let svg_re = Regex::new(r"(?s)<svg.*?</svg>").unwrap();
    svg_re.find(content).map(|m| m.as_str().to_string())
}

/// Parse the first `{...}` span of the naming response as JSON and
/// normalize both title fields. Unusable responses yield `None`.
pub fn parse_titles(content: &str, fallback: &str) -> Option<TitlePair> {
    #[derive(Deserialize)]
    struct RawTitles {
        title: Option<String>,
        #[serde(rename = "titleEn")]
        title_en: Option<String>,
    }

    let json_re = Regex::new(r"(?s)\{.*\}").unwrap();
    let span = json_re.find(content)?;
    let parsed: RawTitles = serde_json::from_str(span.as_str()).ok()?;

    Some(TitlePair {
        title: prompt_service::normalize_title(parsed.title.as_deref().unwrap_or(""), fallback),
        title_en: prompt_service::normalize_title(
            parsed.title_en.as_deref().unwrap_or(""),
            fallback,
        ),
    })
}
