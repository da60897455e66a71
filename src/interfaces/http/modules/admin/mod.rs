//! Admin endpoints: platform stats and moderation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
