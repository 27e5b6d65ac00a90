//! CORS middleware configuration.

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// CORS layer for the public API: any origin, POST/OPTIONS methods,
/// Content-Type header. Both endpoints are called cross-origin from
/// the static frontend.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
