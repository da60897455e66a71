//! Application services
//!
//! One service per aggregate. HTTP handlers stay thin wrappers that
//! delegate here; every business rule and permission check lives in these
//! services so they hold regardless of the transport.

pub mod admin;
pub mod booking;
pub mod identity;
pub mod payment;
pub mod review;
pub mod space;

pub use admin::{AdminService, PlatformStats};
pub use booking::{BookingService, NewBooking};
pub use identity::{AuthResult, IdentityService, ProfileUpdate};
pub use payment::PaymentService;
pub use review::{NewReview, ReviewService, ReviewUpdate};
pub use space::{NewSpace, SpaceService, SpaceUpdate};
