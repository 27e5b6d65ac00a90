//! Application state management.
//!
//! Holds the generation orchestrator, the community service, and the
//! rate limiter. The limiter is an explicitly constructed component
//! owned here - one instance per process, reset on cold start.

use std::sync::Arc;

use crate::middleware::rate_limit::FixedWindowLimiter;
use crate::services::community_service::CommunityService;
use crate::services::generation_service::GenerationService;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<GenerationService>,
    pub community: Arc<CommunityService>,
    pub rate_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(
        generation: GenerationService,
        community: CommunityService,
        rate_limiter: FixedWindowLimiter,
    ) -> Self {
        Self {
            generation: Arc::new(generation),
            community: Arc::new(community),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// Build all components from environment configuration.
    pub fn from_env() -> Self {
        Self::new(
            GenerationService::from_env(),
            CommunityService::from_env(),
            FixedWindowLimiter::from_env(),
        )
    }
}
