//! Repository provider
//!
//! Aggregates the per-entity repositories behind one trait so services can
//! depend on a single `Arc<dyn RepositoryProvider>`.

use crate::domain::booking::BookingRepository;
use crate::domain::parking_space::ParkingSpaceRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::review::ReviewRepository;
use crate::domain::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn spaces(&self) -> &dyn ParkingSpaceRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn reviews(&self) -> &dyn ReviewRepository;
}
