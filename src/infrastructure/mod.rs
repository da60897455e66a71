//! Infrastructure layer: persistence and crypto

pub mod crypto;
pub mod database;
