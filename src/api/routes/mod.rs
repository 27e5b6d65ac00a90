//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod community;
pub mod error;
pub mod generate;

use axum::Router;

pub use app_state::AppState;

/// Create the main API router combining all route modules.
///
/// State is applied by callers (main or TestServer) via `.with_state`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(generate::generate_router())
        .merge(community::community_router())
}

/// Create the application state from environment configuration.
pub fn create_app_state() -> AppState {
    AppState::from_env()
}
