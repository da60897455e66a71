//! Parking space repository interface

use async_trait::async_trait;

use super::model::{Availability, ParkingSpace, SpaceType};
use crate::domain::DomainResult;

/// Search filters for the public space listing.
///
/// `near` narrows results to a radius (meters) around a (longitude, latitude)
/// point; the remaining filters map directly to column predicates.
#[derive(Debug, Clone, Default)]
pub struct SpaceQuery {
    pub near: Option<GeoFilter>,
    pub availability: Option<Availability>,
    pub space_type: Option<SpaceType>,
    pub min_hourly_price: Option<i64>,
    pub max_hourly_price: Option<i64>,
    /// Every listed feature must be present
    pub features: Vec<String>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct GeoFilter {
    pub longitude: f64,
    pub latitude: f64,
    pub radius_m: f64,
}

#[async_trait]
pub trait ParkingSpaceRepository: Send + Sync {
    async fn save(&self, space: ParkingSpace) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingSpace>>;

    async fn update(&self, space: ParkingSpace) -> DomainResult<()>;

    /// Active spaces matching the query, rating-descending, with total count
    async fn search(&self, query: &SpaceQuery) -> DomainResult<(Vec<ParkingSpace>, u64)>;

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ParkingSpace>>;

    /// Overwrite the derived rating aggregate
    async fn update_rating(&self, id: &str, average: f64, count: u32) -> DomainResult<()>;

    /// Bump the lifetime booking counter
    async fn increment_total_bookings(&self, id: &str) -> DomainResult<()>;

    /// Admin moderation: activate/deactivate and force availability
    async fn set_status(
        &self,
        id: &str,
        is_active: Option<bool>,
        availability: Option<Availability>,
    ) -> DomainResult<()>;

    /// All spaces regardless of active flag (admin listing)
    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<ParkingSpace>, u64)>;

    async fn count(&self) -> DomainResult<u64>;
}
