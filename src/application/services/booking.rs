//! Booking service — creation with conflict detection, lifecycle, listings

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::access::{ensure_owner_or_admin, ensure_role, ensure_self_or_admin, Actor};
use crate::domain::booking::{Booking, BookingEvent, BookingStatus, VehicleInfo};
use crate::domain::provider::RepositoryProvider;
use crate::domain::user::UserRole;
use crate::domain::{DomainError, DomainResult};

/// Fields for creating a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub parking_space_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub vehicle: VehicleInfo,
    pub special_requests: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Create a pending booking. The overlap check runs twice: once here for
    /// a friendly error, and again inside the insert transaction, which is
    /// the authoritative one.
    pub async fn create(&self, actor: &Actor, input: NewBooking) -> DomainResult<Booking> {
        if input.start_time < Utc::now() {
            return Err(DomainError::Validation(
                "Booking cannot start in the past".into(),
            ));
        }

        let space = self
            .repos
            .spaces()
            .find_by_id(&input.parking_space_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", &input.parking_space_id))?;
        if !space.is_bookable() {
            return Err(DomainError::InvalidState(
                "Parking space is not available for booking".into(),
            ));
        }

        let conflicting = self
            .repos
            .bookings()
            .find_conflicting(&space.id, input.start_time, input.end_time)
            .await?;
        if !conflicting.is_empty() {
            return Err(DomainError::Conflict(
                "Parking space is already booked for this time window".into(),
            ));
        }

        let booking = Booking::new(
            actor.id.clone(),
            space.id.clone(),
            input.start_time,
            input.end_time,
            space.price.hourly,
            input.vehicle,
            input.special_requests,
        )?;
        self.repos.bookings().insert_checked(booking.clone()).await?;
        self.repos.spaces().increment_total_bookings(&space.id).await?;

        info!(
            booking_id = %booking.id,
            space_id = %space.id,
            total_price = booking.total_price,
            "Booking created"
        );
        Ok(booking)
    }

    /// Cancel by the booking owner or an admin.
    pub async fn cancel(
        &self,
        actor: &Actor,
        id: &str,
        reason: Option<String>,
    ) -> DomainResult<Booking> {
        let mut booking = self.require(id).await?;
        ensure_self_or_admin(actor, &booking.user_id, "cancel this booking")?;

        booking.cancel(reason)?;
        self.repos.bookings().update(booking.clone()).await?;

        info!(booking_id = %id, "Booking cancelled");
        Ok(booking)
    }

    /// Confirm by the space owner or an admin. The overlap invariant is
    /// re-checked in the same transaction as the status write.
    pub async fn confirm(&self, actor: &Actor, id: &str) -> DomainResult<Booking> {
        let mut booking = self.require(id).await?;
        let space = self
            .repos
            .spaces()
            .find_by_id(&booking.parking_space_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", &booking.parking_space_id))?;
        ensure_owner_or_admin(actor, &space.owner_id, "confirm this booking")?;

        booking.apply(BookingEvent::Confirm)?;
        self.repos.bookings().confirm_checked(booking.clone()).await?;

        info!(booking_id = %id, "Booking confirmed");
        Ok(booking)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Detail view for the booking owner, the space owner, or an admin.
    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Booking> {
        let booking = self.require(id).await?;
        if actor.id == booking.user_id || actor.is_admin() {
            return Ok(booking);
        }
        let space = self
            .repos
            .spaces()
            .find_by_id(&booking.parking_space_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", &booking.parking_space_id))?;
        ensure_owner_or_admin(actor, &space.owner_id, "view this booking")?;
        Ok(booking)
    }

    pub async fn list_mine(
        &self,
        actor: &Actor,
        status: Option<BookingStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)> {
        self.repos
            .bookings()
            .find_by_user(&actor.id, status, page, limit)
            .await
    }

    /// Bookings across all of the caller's spaces (provider dashboard).
    pub async fn list_for_my_spaces(&self, actor: &Actor) -> DomainResult<Vec<Booking>> {
        ensure_role(
            actor,
            &[UserRole::Provider, UserRole::Admin],
            "view bookings for owned spaces",
        )?;
        let spaces = self.repos.spaces().find_by_owner(&actor.id).await?;
        let ids: Vec<String> = spaces.into_iter().map(|s| s.id).collect();
        self.repos.bookings().find_for_spaces(&ids).await
    }

    async fn require(&self, id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_repos, seed_space};
    use chrono::Duration;

    fn renter() -> Actor {
        Actor::new("renter-1", UserRole::User)
    }

    fn vehicle() -> VehicleInfo {
        VehicleInfo {
            license_plate: "12가3456".into(),
            model: Some("Ioniq 5".into()),
            color: None,
        }
    }

    fn window(hours_from_now: i64, len_hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now() + Duration::hours(hours_from_now);
        (start, start + Duration::hours(len_hours))
    }

    fn new_booking(space_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> NewBooking {
        NewBooking {
            parking_space_id: space_id.into(),
            start_time: start,
            end_time: end,
            vehicle: vehicle(),
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn create_prices_by_ceiling_hours() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos);

        let start = Utc::now() + Duration::hours(1);
        let end = start + Duration::minutes(90);
        let booking = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();
        assert_eq!(booking.duration_hours, 2);
        assert_eq!(booking.total_price, 10000);
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn create_bumps_total_bookings() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos.clone());

        let (start, end) = window(1, 2);
        svc.create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();
        let reloaded = repos.spaces().find_by_id(&space.id).await.unwrap().unwrap();
        assert_eq!(reloaded.total_bookings, 1);
    }

    #[tokio::test]
    async fn overlapping_confirmed_booking_conflicts() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos.clone());

        let (start, end) = window(2, 3);
        let first = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();
        let owner = Actor::new("provider-1", UserRole::Provider);
        svc.confirm(&owner, &first.id).await.unwrap();

        // Overlaps the middle of the confirmed window
        let err = svc
            .create(
                &Actor::new("renter-2", UserRole::User),
                new_booking(&space.id, start + Duration::hours(1), end + Duration::hours(1)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn pending_bookings_do_not_block() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos);

        let (start, end) = window(2, 2);
        svc.create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();
        // Same window again: the first booking is still pending
        svc.create(
            &Actor::new("renter-2", UserRole::User),
            new_booking(&space.id, start, end),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn back_to_back_windows_are_allowed() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos);

        let (start, end) = window(2, 2);
        let first = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();
        let owner = Actor::new("provider-1", UserRole::Provider);
        svc.confirm(&owner, &first.id).await.unwrap();

        // Starts exactly when the confirmed one ends
        svc.create(
            &Actor::new("renter-2", UserRole::User),
            new_booking(&space.id, end, end + Duration::hours(1)),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn non_owner_cannot_confirm() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos);

        let (start, end) = window(1, 2);
        let booking = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();

        let stranger = Actor::new("provider-2", UserRole::Provider);
        let err = svc.confirm(&stranger, &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        // The renter cannot confirm their own booking either
        let err = svc.confirm(&renter(), &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn cancel_is_rejected_after_completion() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos.clone());

        let (start, end) = window(1, 2);
        let mut booking = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();
        booking.status = BookingStatus::Completed;
        repos.bookings().update(booking.clone()).await.unwrap();

        let err = svc.cancel(&renter(), &booking.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unbookable_space_is_rejected() {
        let repos = memory_repos();
        let mut space = seed_space(&repos, "provider-1", 5000).await;
        space.availability = crate::domain::parking_space::Availability::Unavailable;
        repos.spaces().update(space.clone()).await.unwrap();
        let svc = BookingService::new(repos);

        let (start, end) = window(1, 2);
        let err = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn stranger_cannot_view_booking() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = BookingService::new(repos);

        let (start, end) = window(1, 2);
        let booking = svc
            .create(&renter(), new_booking(&space.id, start, end))
            .await
            .unwrap();

        // Space owner may view it
        let owner = Actor::new("provider-1", UserRole::Provider);
        svc.get(&owner, &booking.id).await.unwrap();

        let stranger = Actor::new("nosy", UserRole::User);
        let err = svc.get(&stranger, &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
