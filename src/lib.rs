//! # ParkShare
//!
//! Backend for a peer-to-peer parking space marketplace: providers list
//! their spaces, users search and book them for time windows, pay, and
//! review completed stays.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: entities, lifecycle rules and repository traits
//! - **application**: one service per aggregate; all business rules and
//!   permission checks
//! - **infrastructure**: SeaORM persistence, migrations, JWT and password
//!   hashing
//! - **interfaces**: the REST API (axum) with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;

// Re-export API router
pub use interfaces::http::create_api_router;
