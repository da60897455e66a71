//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_parking_spaces;
mod m20250101_000003_create_bookings;
mod m20250101_000004_create_payments;
mod m20250101_000005_create_reviews;
mod m20250101_000006_create_review_votes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_parking_spaces::Migration),
            Box::new(m20250101_000003_create_bookings::Migration),
            Box::new(m20250101_000004_create_payments::Migration),
            Box::new(m20250101_000005_create_reviews::Migration),
            Box::new(m20250101_000006_create_review_votes::Migration),
        ]
    }
}
