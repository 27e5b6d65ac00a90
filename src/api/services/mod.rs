//! Services module - generation pipeline and community gallery logic.

pub mod community_service;
pub mod generation_service;
pub mod openrouter_client;
pub mod prompt_service;

// Re-export for convenience
pub use community_service::{CommunityService, NewMetaphor};
pub use generation_service::{GenerationError, GenerationOutcome, GenerationService, TitlePair};
pub use openrouter_client::{ChatClient, InvokeError};
