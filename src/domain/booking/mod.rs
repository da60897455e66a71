//! Booking domain: reservation entity, pricing, conflict predicate and the
//! lifecycle state machine.

mod lifecycle;
mod model;
mod repository;

pub use lifecycle::{transition, BookingEvent, Transition};
pub use model::{
    intervals_overlap, quote, Booking, BookingPaymentStatus, BookingStatus, VehicleInfo,
};
pub use repository::BookingRepository;
