//! Parking space service — listing, search, owner management

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::access::{ensure_owner_or_admin, ensure_role, Actor};
use crate::domain::parking_space::{
    Availability, ParkingSpace, Price, Rating, SpaceQuery, SpaceSize, SpaceType, TimeSlot,
    ALLOWED_FEATURES,
};
use crate::domain::provider::RepositoryProvider;
use crate::domain::user::UserRole;
use crate::domain::{DomainError, DomainResult};

/// Fields for creating a new listing
#[derive(Debug, Clone)]
pub struct NewSpace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub price: Price,
    pub space_type: SpaceType,
    pub space_size: SpaceSize,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub available_time_slots: Vec<TimeSlot>,
}

/// Partial update of an existing listing
#[derive(Debug, Clone, Default)]
pub struct SpaceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub price: Option<Price>,
    pub availability: Option<Availability>,
    pub space_type: Option<SpaceType>,
    pub space_size: Option<SpaceSize>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub available_time_slots: Option<Vec<TimeSlot>>,
}

pub struct SpaceService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SpaceService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn validate_features(features: &[String]) -> DomainResult<()> {
        for feature in features {
            if !ALLOWED_FEATURES.contains(&feature.as_str()) {
                return Err(DomainError::Validation(format!(
                    "Unknown feature '{}'",
                    feature
                )));
            }
        }
        Ok(())
    }

    fn validate_coordinates(longitude: f64, latitude: f64) -> DomainResult<()> {
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::Validation("Invalid coordinates".into()));
        }
        Ok(())
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(&self, actor: &Actor, input: NewSpace) -> DomainResult<ParkingSpace> {
        ensure_role(
            actor,
            &[UserRole::Provider, UserRole::Admin],
            "create parking spaces",
        )?;
        Self::validate_features(&input.features)?;
        Self::validate_coordinates(input.longitude, input.latitude)?;
        if input.price.hourly < 0 {
            return Err(DomainError::Validation(
                "Hourly price must not be negative".into(),
            ));
        }

        let now = Utc::now();
        let space = ParkingSpace {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: actor.id.clone(),
            title: input.title,
            description: input.description,
            address: input.address,
            longitude: input.longitude,
            latitude: input.latitude,
            price: input.price,
            availability: Availability::Available,
            space_type: input.space_type,
            space_size: input.space_size,
            features: input.features,
            images: input.images,
            available_time_slots: input.available_time_slots,
            rating: Rating::default(),
            total_bookings: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.repos.spaces().save(space.clone()).await?;

        info!(space_id = %space.id, owner_id = %space.owner_id, "Parking space listed");
        Ok(space)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        update: SpaceUpdate,
    ) -> DomainResult<ParkingSpace> {
        let mut space = self.require(id).await?;
        ensure_owner_or_admin(actor, &space.owner_id, "update this parking space")?;

        if let Some(features) = &update.features {
            Self::validate_features(features)?;
        }
        if let Some(price) = &update.price {
            if price.hourly < 0 {
                return Err(DomainError::Validation(
                    "Hourly price must not be negative".into(),
                ));
            }
        }

        if let Some(title) = update.title {
            space.title = title;
        }
        if let Some(description) = update.description {
            space.description = description;
        }
        if let Some(address) = update.address {
            space.address = address;
        }
        if let Some(price) = update.price {
            space.price = price;
        }
        if let Some(availability) = update.availability {
            space.availability = availability;
        }
        if let Some(space_type) = update.space_type {
            space.space_type = space_type;
        }
        if let Some(space_size) = update.space_size {
            space.space_size = space_size;
        }
        if let Some(features) = update.features {
            space.features = features;
        }
        if let Some(images) = update.images {
            space.images = images;
        }
        if let Some(slots) = update.available_time_slots {
            space.available_time_slots = slots;
        }
        space.updated_at = Utc::now();

        self.repos.spaces().update(space.clone()).await?;
        Ok(space)
    }

    /// Soft delete: the listing disappears from search but its history stays.
    pub async fn deactivate(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        let mut space = self.require(id).await?;
        ensure_owner_or_admin(actor, &space.owner_id, "delete this parking space")?;

        space.is_active = false;
        space.updated_at = Utc::now();
        self.repos.spaces().update(space).await?;

        info!(space_id = %id, "Parking space deactivated");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Public detail view. Deactivated listings are indistinguishable from
    /// missing ones.
    pub async fn get_public(&self, id: &str) -> DomainResult<ParkingSpace> {
        let space = self.require(id).await?;
        if !space.is_active {
            return Err(DomainError::not_found("ParkingSpace", id));
        }
        Ok(space)
    }

    pub async fn search(&self, query: &SpaceQuery) -> DomainResult<(Vec<ParkingSpace>, u64)> {
        self.repos.spaces().search(query).await
    }

    pub async fn my_spaces(&self, actor: &Actor) -> DomainResult<Vec<ParkingSpace>> {
        self.repos.spaces().find_by_owner(&actor.id).await
    }

    async fn require(&self, id: &str) -> DomainResult<ParkingSpace> {
        self.repos
            .spaces()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::memory_repos;

    fn provider() -> Actor {
        Actor::new("provider-1", UserRole::Provider)
    }

    fn sample_input() -> NewSpace {
        NewSpace {
            title: "Gangnam lot".into(),
            description: "Near exit 4".into(),
            address: "Seoul".into(),
            longitude: 127.0276,
            latitude: 37.4979,
            price: Price {
                hourly: 5000,
                daily: None,
                monthly: None,
            },
            space_type: SpaceType::Outdoor,
            space_size: SpaceSize::Standard,
            features: vec!["cctv".into()],
            images: vec![],
            available_time_slots: vec![],
        }
    }

    #[tokio::test]
    async fn plain_user_cannot_create() {
        let svc = SpaceService::new(memory_repos());
        let user = Actor::new("u1", UserRole::User);
        let err = svc.create(&user, sample_input()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn provider_creates_available_listing() {
        let svc = SpaceService::new(memory_repos());
        let space = svc.create(&provider(), sample_input()).await.unwrap();
        assert_eq!(space.owner_id, "provider-1");
        assert_eq!(space.availability, Availability::Available);
        assert!(space.is_active);
        assert_eq!(space.rating.count, 0);
    }

    #[tokio::test]
    async fn unknown_feature_is_rejected() {
        let svc = SpaceService::new(memory_repos());
        let mut input = sample_input();
        input.features.push("valet".into());
        let err = svc.create(&provider(), input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn non_owner_cannot_update() {
        let svc = SpaceService::new(memory_repos());
        let space = svc.create(&provider(), sample_input()).await.unwrap();

        let other = Actor::new("provider-2", UserRole::Provider);
        let err = svc
            .update(&other, &space.id, SpaceUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_can_update_any_listing() {
        let svc = SpaceService::new(memory_repos());
        let space = svc.create(&provider(), sample_input()).await.unwrap();

        let admin = Actor::new("admin-1", UserRole::Admin);
        let updated = svc
            .update(
                &admin,
                &space.id,
                SpaceUpdate {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn deactivated_listing_is_not_publicly_visible() {
        let svc = SpaceService::new(memory_repos());
        let space = svc.create(&provider(), sample_input()).await.unwrap();

        svc.deactivate(&provider(), &space.id).await.unwrap();
        let err = svc.get_public(&space.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
