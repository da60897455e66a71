//! Core business entities, lifecycle rules and repository interfaces

pub mod access;
pub mod booking;
pub mod error;
pub mod parking_space;
pub mod payment;
pub mod provider;
pub mod review;
pub mod user;

// Re-export commonly used types
pub use access::Actor;
pub use booking::{Booking, BookingEvent, BookingPaymentStatus, BookingStatus, VehicleInfo};
pub use error::{DomainError, DomainResult};
pub use parking_space::{Availability, ParkingSpace, SpaceQuery, SpaceSize, SpaceType};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use provider::RepositoryProvider;
pub use review::Review;
pub use user::{User, UserRole};
