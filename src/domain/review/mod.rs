//! Review domain: review entity, rating aggregation and repository interface

mod model;
mod repository;

pub use model::{aggregate_rating, OwnerResponse, Review};
pub use repository::ReviewRepository;
