//! SeaORM entities

pub mod booking;
pub mod parking_space;
pub mod payment;
pub mod review;
pub mod review_vote;
pub mod user;
