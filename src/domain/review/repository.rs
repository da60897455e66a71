//! Review repository interface

use async_trait::async_trait;

use super::model::Review;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review. The one-review-per-booking invariant is enforced by
    /// a unique index on booking_id; violations surface as Conflict.
    async fn insert(&self, review: Review) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>>;

    async fn find_by_booking(&self, booking_id: &str) -> DomainResult<Option<Review>>;

    async fn update(&self, review: Review) -> DomainResult<()>;

    /// Visible reviews of a space, newest first
    async fn find_visible_for_space(
        &self,
        parking_space_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Review>, u64)>;

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Review>>;

    /// Ratings of all currently-visible reviews for a space; the scan behind
    /// the full rating recompute
    async fn visible_ratings(&self, parking_space_id: &str) -> DomainResult<Vec<i32>>;

    /// Toggle `user_id`'s helpful vote in one transaction against the vote
    /// set (unique per review+user) and adjust the counter by ±1.
    /// Returns the updated review and whether the vote is now present.
    async fn toggle_helpful(&self, review_id: &str, user_id: &str) -> DomainResult<(Review, bool)>;

    async fn set_visibility(&self, review_id: &str, visible: bool) -> DomainResult<Review>;
}
