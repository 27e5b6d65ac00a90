// Models module - request/response types, community document types, enums

pub mod community;
pub mod enums;
pub mod generation;

pub use community::{CommunityDocument, CommunityMetaphor, VoteTally};
pub use enums::{AnimationLevel, Complexity, VisualStyle};
pub use generation::{GenerateRequest, GenerateResponse};
