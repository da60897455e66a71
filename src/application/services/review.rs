//! Review service — creation guards, rating aggregation, helpful votes
//!
//! Every operation that changes the set of visible reviews for a space ends
//! with a full recompute of that space's rating aggregate, so the stored
//! average always matches the visible reviews.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::access::{ensure_owner_or_admin, ensure_role, Actor};
use crate::domain::booking::BookingStatus;
use crate::domain::provider::RepositoryProvider;
use crate::domain::review::{aggregate_rating, OwnerResponse, Review};
use crate::domain::user::UserRole;
use crate::domain::{DomainError, DomainResult};

/// Fields for creating a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub booking_id: String,
    pub rating: i32,
    pub comment: String,
    pub images: Vec<String>,
}

/// Partial update by the review author
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub images: Option<Vec<String>>,
}

pub struct ReviewService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReviewService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn validate_rating(rating: i32) -> DomainResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::Validation(
                "Rating must be between 1 and 5".into(),
            ));
        }
        Ok(())
    }

    /// Recompute a space's rating aggregate from its visible reviews.
    async fn recompute_rating(&self, parking_space_id: &str) -> DomainResult<()> {
        let ratings = self.repos.reviews().visible_ratings(parking_space_id).await?;
        let (average, count) = aggregate_rating(&ratings);
        self.repos
            .spaces()
            .update_rating(parking_space_id, average, count)
            .await
    }

    // ── Commands ────────────────────────────────────────────────

    /// Create a review for a completed booking. Exactly the booking's user
    /// may review, and only once per booking.
    pub async fn create(&self, actor: &Actor, input: NewReview) -> DomainResult<Review> {
        Self::validate_rating(input.rating)?;

        let booking = self
            .repos
            .bookings()
            .find_by_id(&input.booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", &input.booking_id))?;
        if actor.id != booking.user_id {
            return Err(DomainError::Forbidden(
                "Only the booking's user may review it".into(),
            ));
        }
        if booking.status != BookingStatus::Completed {
            return Err(DomainError::InvalidState(
                "Only completed bookings can be reviewed".into(),
            ));
        }
        if self
            .repos
            .reviews()
            .find_by_booking(&booking.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "This booking has already been reviewed".into(),
            ));
        }

        let review = Review::new(
            booking.parking_space_id.clone(),
            booking.id.clone(),
            actor.id.clone(),
            input.rating,
            input.comment,
            input.images,
        );
        self.repos.reviews().insert(review.clone()).await?;
        self.recompute_rating(&review.parking_space_id).await?;

        info!(review_id = %review.id, space_id = %review.parking_space_id, "Review created");
        Ok(review)
    }

    /// Author-only update; re-triggers aggregation.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        update: ReviewUpdate,
    ) -> DomainResult<Review> {
        let mut review = self.require(id).await?;
        if actor.id != review.user_id {
            return Err(DomainError::Forbidden(
                "Only the author may edit this review".into(),
            ));
        }

        if let Some(rating) = update.rating {
            Self::validate_rating(rating)?;
            review.rating = rating;
        }
        if let Some(comment) = update.comment {
            review.comment = comment;
        }
        if let Some(images) = update.images {
            review.images = images;
        }
        review.updated_at = Utc::now();

        self.repos.reviews().update(review.clone()).await?;
        self.recompute_rating(&review.parking_space_id).await?;
        Ok(review)
    }

    /// Soft delete by author or admin: the review is hidden, not removed,
    /// and stops counting toward the aggregate.
    pub async fn hide(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        let review = self.require(id).await?;
        if actor.id != review.user_id && !actor.is_admin() {
            return Err(DomainError::Forbidden(
                "Not allowed to delete this review".into(),
            ));
        }

        self.repos.reviews().set_visibility(id, false).await?;
        self.recompute_rating(&review.parking_space_id).await?;

        info!(review_id = %id, "Review hidden");
        Ok(())
    }

    /// Admin moderation: show or hide any review; re-triggers aggregation.
    pub async fn set_visibility(
        &self,
        actor: &Actor,
        id: &str,
        visible: bool,
    ) -> DomainResult<Review> {
        ensure_role(actor, &[UserRole::Admin], "moderate reviews")?;

        let review = self.repos.reviews().set_visibility(id, visible).await?;
        self.recompute_rating(&review.parking_space_id).await?;
        Ok(review)
    }

    /// Toggle the caller's helpful vote. Voting twice removes the vote.
    pub async fn mark_helpful(&self, actor: &Actor, id: &str) -> DomainResult<(Review, bool)> {
        self.repos.reviews().toggle_helpful(id, &actor.id).await
    }

    /// Owner response, by the space owner or an admin.
    pub async fn respond(&self, actor: &Actor, id: &str, text: String) -> DomainResult<Review> {
        let mut review = self.require(id).await?;
        let space = self
            .repos
            .spaces()
            .find_by_id(&review.parking_space_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", &review.parking_space_id))?;
        ensure_owner_or_admin(actor, &space.owner_id, "respond to this review")?;

        review.response = Some(OwnerResponse {
            text,
            responded_at: Utc::now(),
        });
        review.updated_at = Utc::now();
        self.repos.reviews().update(review.clone()).await?;
        Ok(review)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_for_space(
        &self,
        parking_space_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Review>, u64)> {
        self.repos
            .reviews()
            .find_visible_for_space(parking_space_id, page, limit)
            .await
    }

    pub async fn list_mine(&self, actor: &Actor) -> DomainResult<Vec<Review>> {
        self.repos.reviews().find_by_user(&actor.id).await
    }

    async fn require(&self, id: &str) -> DomainResult<Review> {
        self.repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", id))
    }
}
