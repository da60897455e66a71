//! SeaORM implementation of ParkingSpaceRepository
//!
//! Geo search pre-filters candidates with a bounding box on the raw
//! longitude/latitude columns, then applies the exact haversine distance in
//! Rust before paging.

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use crate::domain::parking_space::{
    haversine_m, Availability, ParkingSpace, ParkingSpaceRepository, Price, Rating, SpaceQuery,
    SpaceSize, SpaceType, TimeSlot,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::parking_space;

// Meters per degree of latitude; longitude shrinks with cos(latitude).
const METERS_PER_DEGREE: f64 = 111_320.0;

pub struct SeaOrmParkingSpaceRepository {
    db: DatabaseConnection,
}

impl SeaOrmParkingSpaceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: parking_space::Model) -> ParkingSpace {
    ParkingSpace {
        id: m.id,
        owner_id: m.owner_id,
        title: m.title,
        description: m.description,
        address: m.address,
        longitude: m.longitude,
        latitude: m.latitude,
        price: Price {
            hourly: m.price_hourly,
            daily: m.price_daily,
            monthly: m.price_monthly,
        },
        availability: Availability::from_str(&m.availability),
        space_type: SpaceType::from_str(&m.space_type).unwrap_or(SpaceType::Outdoor),
        space_size: SpaceSize::from_str(&m.space_size),
        features: serde_json::from_str(&m.features).unwrap_or_default(),
        images: serde_json::from_str(&m.images).unwrap_or_default(),
        available_time_slots: serde_json::from_str::<Vec<TimeSlot>>(&m.available_time_slots)
            .unwrap_or_default(),
        rating: Rating {
            average: m.rating_average,
            count: m.rating_count.max(0) as u32,
        },
        total_bookings: m.total_bookings.max(0) as u32,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(s: ParkingSpace) -> parking_space::ActiveModel {
    parking_space::ActiveModel {
        id: Set(s.id),
        owner_id: Set(s.owner_id),
        title: Set(s.title),
        description: Set(s.description),
        address: Set(s.address),
        longitude: Set(s.longitude),
        latitude: Set(s.latitude),
        price_hourly: Set(s.price.hourly),
        price_daily: Set(s.price.daily),
        price_monthly: Set(s.price.monthly),
        availability: Set(s.availability.as_str().to_string()),
        space_type: Set(s.space_type.as_str().to_string()),
        space_size: Set(s.space_size.as_str().to_string()),
        features: Set(serde_json::to_string(&s.features).unwrap_or_else(|_| "[]".into())),
        images: Set(serde_json::to_string(&s.images).unwrap_or_else(|_| "[]".into())),
        available_time_slots: Set(
            serde_json::to_string(&s.available_time_slots).unwrap_or_else(|_| "[]".into())
        ),
        rating_average: Set(s.rating.average),
        rating_count: Set(s.rating.count as i32),
        total_bookings: Set(s.total_bookings as i32),
        is_active: Set(s.is_active),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Apply the non-geo column filters of a search query.
fn apply_filters(
    mut select: Select<parking_space::Entity>,
    query: &SpaceQuery,
) -> Select<parking_space::Entity> {
    select = select.filter(parking_space::Column::IsActive.eq(true));
    if let Some(availability) = query.availability {
        select = select.filter(parking_space::Column::Availability.eq(availability.as_str()));
    }
    if let Some(space_type) = query.space_type {
        select = select.filter(parking_space::Column::SpaceType.eq(space_type.as_str()));
    }
    if let Some(min) = query.min_hourly_price {
        select = select.filter(parking_space::Column::PriceHourly.gte(min));
    }
    if let Some(max) = query.max_hourly_price {
        select = select.filter(parking_space::Column::PriceHourly.lte(max));
    }
    // Features live in a JSON text column; match the quoted element.
    for feature in &query.features {
        select = select.filter(parking_space::Column::Features.contains(format!("\"{}\"", feature)));
    }
    select
}

// ── ParkingSpaceRepository impl ─────────────────────────────────

#[async_trait]
impl ParkingSpaceRepository for SeaOrmParkingSpaceRepository {
    async fn save(&self, s: ParkingSpace) -> DomainResult<()> {
        debug!("Saving parking space: {}", s.id);
        domain_to_active(s).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingSpace>> {
        let model = parking_space::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, s: ParkingSpace) -> DomainResult<()> {
        debug!("Updating parking space: {}", s.id);

        let existing = parking_space::Entity::find_by_id(&s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("ParkingSpace", s.id));
        }

        domain_to_active(s).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn search(&self, query: &SpaceQuery) -> DomainResult<(Vec<ParkingSpace>, u64)> {
        let limit = query.limit.max(1);
        let page = query.page.max(1);

        if let Some(geo) = query.near {
            let d_lat = geo.radius_m / METERS_PER_DEGREE;
            let d_lng = geo.radius_m / (METERS_PER_DEGREE * geo.latitude.to_radians().cos().abs().max(0.01));

            let select = apply_filters(parking_space::Entity::find(), query)
                .filter(parking_space::Column::Latitude.between(geo.latitude - d_lat, geo.latitude + d_lat))
                .filter(parking_space::Column::Longitude.between(geo.longitude - d_lng, geo.longitude + d_lng))
                .order_by_desc(parking_space::Column::RatingAverage);

            let models = select.all(&self.db).await.map_err(db_err)?;
            let matches: Vec<ParkingSpace> = models
                .into_iter()
                .map(model_to_domain)
                .filter(|s| {
                    haversine_m(geo.longitude, geo.latitude, s.longitude, s.latitude)
                        <= geo.radius_m
                })
                .collect();

            let total = matches.len() as u64;
            let start = ((page - 1) * limit) as usize;
            let items = matches.into_iter().skip(start).take(limit as usize).collect();
            return Ok((items, total));
        }

        let paginator = apply_filters(parking_space::Entity::find(), query)
            .order_by_desc(parking_space::Column::RatingAverage)
            .paginate(&self.db, limit as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page((page - 1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ParkingSpace>> {
        let models = parking_space::Entity::find()
            .filter(parking_space::Column::OwnerId.eq(owner_id))
            .order_by_desc(parking_space::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_rating(&self, id: &str, average: f64, count: u32) -> DomainResult<()> {
        let existing = parking_space::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;

        let mut active: parking_space::ActiveModel = existing.into();
        active.rating_average = Set(average);
        active.rating_count = Set(count as i32);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn increment_total_bookings(&self, id: &str) -> DomainResult<()> {
        let existing = parking_space::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;

        let next = existing.total_bookings + 1;
        let mut active: parking_space::ActiveModel = existing.into();
        active.total_bookings = Set(next);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        is_active: Option<bool>,
        availability: Option<Availability>,
    ) -> DomainResult<()> {
        let existing = parking_space::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;

        let mut active: parking_space::ActiveModel = existing.into();
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        if let Some(availability) = availability {
            active.availability = Set(availability.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<ParkingSpace>, u64)> {
        let paginator = parking_space::Entity::find()
            .order_by_desc(parking_space::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn count(&self) -> DomainResult<u64> {
        parking_space::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
