//! Parking space listing and search endpoints

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
