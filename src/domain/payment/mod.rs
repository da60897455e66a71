//! Payment domain: payment entity and repository interface

mod model;
mod repository;

pub use model::{generate_transaction_id, Payment, PaymentMethod, PaymentStatus, Refund};
pub use repository::PaymentRepository;
