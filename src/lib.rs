// API module for the visual metaphor backend
pub mod api;

// Re-export api modules at crate root so consumers (binary, tests) can
// use crate-level paths like visual_metaphor_api::services
pub use api::middleware;
pub use api::models;
pub use api::routes;
pub use api::services;
pub use api::storage;
