//! Community gallery save endpoint.

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use super::error::ApiError;
use crate::models::community::{MAX_SVG_LEN, is_svg_document};
use crate::services::community_service::NewMetaphor;

/// Body of `POST /save-community`. Fields are optional at the serde
/// level so each missing field gets its own 400 message.
#[derive(Debug, Deserialize)]
pub struct SaveCommunityRequest {
    pub svg: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "titleEn")]
    pub title_en: Option<String>,
    pub prompt: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveCommunityResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
}

/// Create the community save router.
pub fn community_router() -> Router<AppState> {
    Router::new().route(
        "/save-community",
        post(save_community_metaphor).options(|| async { StatusCode::NO_CONTENT }),
    )
}

/// POST /save-community - append a metaphor to the shared gallery.
async fn save_community_metaphor(
    State(state): State<AppState>,
    payload: Result<Json<SaveCommunityRequest>, JsonRejection>,
) -> Result<Json<SaveCommunityResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?;

    let svg = require_field(request.svg, "SVG is required")?;
    let title = require_field(request.title, "Title is required")?;
    let title_en = require_field(request.title_en, "English title is required")?;
    let prompt = require_field(request.prompt, "Prompt is required")?;
    let author = request
        .author
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| "anonymous".to_string());

    if !is_svg_document(&svg) {
        return Err(ApiError::bad_request("Invalid SVG format"));
    }
    if svg.len() > MAX_SVG_LEN {
        return Err(ApiError::bad_request("SVG too large (max 100KB)"));
    }

    info!("Saving community metaphor: \"{}\" by {}", title_en, author);

    let id = state
        .community
        .append(NewMetaphor {
            title,
            title_en,
            prompt,
            svg,
            author,
        })
        .await?;

    Ok(Json(SaveCommunityResponse {
        success: true,
        id,
        message: "Metaphor saved to community gallery".to_string(),
    }))
}

fn require_field(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}
