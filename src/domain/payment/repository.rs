//! Payment repository interface

use async_trait::async_trait;

use super::model::{Payment, PaymentStatus};
use crate::domain::booking::Booking;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment after re-checking the at-most-one-active invariant
    /// for its booking inside one database transaction. Fails with Conflict
    /// if a pending or completed payment already exists.
    async fn insert_checked(&self, payment: Payment) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>>;

    /// Active (pending/completed) payment for a booking, if any
    async fn find_active_for_booking(&self, booking_id: &str) -> DomainResult<Option<Payment>>;

    /// Persist a payment state change together with its booking cascade as
    /// one atomic unit. Either both rows update or neither does.
    async fn update_with_booking(&self, payment: Payment, booking: Booking) -> DomainResult<()>;

    /// A user's payments, optional status filter, newest first
    async fn find_by_user(
        &self,
        user_id: &str,
        status: Option<PaymentStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Payment>, u64)>;

    /// All payments (admin listing), newest first
    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<Payment>, u64)>;

    /// Sum of completed payment amounts
    async fn total_revenue(&self) -> DomainResult<i64>;

    async fn count(&self) -> DomainResult<u64>;
}
