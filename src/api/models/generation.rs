//! Request and response types for the generation endpoint.

use serde::{Deserialize, Serialize};

use super::enums::{AnimationLevel, Complexity, VisualStyle};

/// Minimum concept text length in characters.
pub const MIN_CONCEPT_LEN: usize = 3;
/// Maximum concept text length in characters.
pub const MAX_CONCEPT_LEN: usize = 1000;

/// Body of `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Free-text concept to visualize.
    pub text: String,
    #[serde(default)]
    pub style: VisualStyle,
    /// Target model identifier; falls back to the configured default.
    #[serde(default)]
    pub model: Option<String>,
    /// Caller-supplied credential. Overrides the server credential and
    /// bypasses rate limiting.
    #[serde(default, rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub animation: AnimationLevel,
}

impl GenerateRequest {
    /// Validate concept text bounds. Always runs before any network call.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.text.chars().count();
        if len < MIN_CONCEPT_LEN {
            return Err(format!(
                "Text is required (min {MIN_CONCEPT_LEN} characters)"
            ));
        }
        if len > MAX_CONCEPT_LEN {
            return Err(format!("Text too long (max {MAX_CONCEPT_LEN} characters)"));
        }
        Ok(())
    }
}

/// Success body of `POST /generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// The extracted SVG document.
    pub svg: String,
    /// Identifier of the model that actually produced the document.
    pub model: String,
    /// Wall-clock generation time in milliseconds.
    pub elapsed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "titleEn", skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
}
