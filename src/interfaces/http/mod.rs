//! HTTP REST API
//!
//! - `common`: response envelope, pagination, error mapping, validated JSON
//! - `middleware`: JWT authentication
//! - `modules`: one handler/DTO module per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
