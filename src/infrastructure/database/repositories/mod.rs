//! SeaORM-backed repository implementations

pub mod booking_repository;
pub mod parking_space_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod review_repository;
pub mod user_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use parking_space_repository::SeaOrmParkingSpaceRepository;
pub use payment_repository::SeaOrmPaymentRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use review_repository::SeaOrmReviewRepository;
pub use user_repository::SeaOrmUserRepository;
