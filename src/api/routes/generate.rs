//! Generation endpoint routes.

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tracing::info;

use super::AppState;
use super::error::ApiError;
use crate::models::generation::{GenerateRequest, GenerateResponse};

/// Create the generation router.
pub fn generate_router() -> Router<AppState> {
    Router::new().route(
        "/generate",
        post(generate_metaphor).options(|| async { StatusCode::NO_CONTENT }),
    )
}

/// POST /generate - produce an SVG visual metaphor for a concept.
async fn generate_metaphor(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?;

    request.validate().map_err(ApiError::bad_request)?;

    // Callers with their own credential bear the upstream cost and
    // skip the shared rate limit.
    if request.api_key.is_none() {
        let caller = caller_identity(&headers);
        if !state.rate_limiter.check(&caller) {
            return Err(ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please wait a minute.",
            ));
        }
    }

    let preview: String = request.text.chars().take(50).collect();
    info!("Generating metaphor for: \"{}\"", preview);

    let outcome = state.generation.generate(&request).await?;

    Ok(Json(GenerateResponse {
        svg: outcome.svg,
        model: outcome.model,
        elapsed: outcome.elapsed_ms,
        title: outcome.titles.as_ref().map(|t| t.title.clone()),
        title_en: outcome.titles.map(|t| t.title_en),
    }))
}

/// Best-available network identity of the request origin. Used for
/// rate-limit bucketing only, never authentication.
fn caller_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("client-ip"))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
