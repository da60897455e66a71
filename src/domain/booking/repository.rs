//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a booking after re-checking the overlap invariant against
    /// schedule-blocking bookings of the same space, inside one database
    /// transaction. Fails with Conflict on overlap.
    async fn insert_checked(&self, booking: Booking) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// Persist a confirm transition, re-running the overlap check (excluding
    /// the booking itself) in the same transaction.
    async fn confirm_checked(&self, booking: Booking) -> DomainResult<()>;

    /// Schedule-blocking bookings of a space overlapping `[start, end)`
    async fn find_conflicting(
        &self,
        parking_space_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// A user's bookings, optional status filter, newest first
    async fn find_by_user(
        &self,
        user_id: &str,
        status: Option<BookingStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)>;

    /// Bookings across a set of spaces (provider's dashboard), newest first
    async fn find_for_spaces(&self, space_ids: &[String]) -> DomainResult<Vec<Booking>>;

    /// All bookings (admin listing), newest first
    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<Booking>, u64)>;

    async fn count(&self) -> DomainResult<u64>;
}
