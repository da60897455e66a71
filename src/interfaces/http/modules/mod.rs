//! Feature modules of the REST API, one directory per resource

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod metrics;
pub mod payments;
pub mod reviews;
pub mod spaces;
