//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::parking_space::ParkingSpaceRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::provider::RepositoryProvider;
use crate::domain::review::ReviewRepository;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::parking_space_repository::SeaOrmParkingSpaceRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::review_repository::SeaOrmReviewRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let space = repos.spaces().find_by_id("sp-001").await?;
/// let conflicts = repos.bookings().find_conflicting("sp-001", start, end).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    spaces: SeaOrmParkingSpaceRepository,
    bookings: SeaOrmBookingRepository,
    payments: SeaOrmPaymentRepository,
    reviews: SeaOrmReviewRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            spaces: SeaOrmParkingSpaceRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            reviews: SeaOrmReviewRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn spaces(&self) -> &dyn ParkingSpaceRepository {
        &self.spaces
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        &self.reviews
    }
}
