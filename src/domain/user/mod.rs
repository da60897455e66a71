//! User domain: account entity and repository interface

mod model;
mod repository;

pub use model::{User, UserRole};
pub use repository::UserRepository;
