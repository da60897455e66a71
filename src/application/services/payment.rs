//! Payment service — creation, completion, refund with booking cascades
//!
//! Completion and refund change the payment and the booking together; the
//! repository persists both rows in one transaction.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::access::{ensure_self_or_admin, Actor};
use crate::domain::booking::BookingEvent;
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::provider::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Create a pending payment for a booking. The amount always comes from
    /// the booking, never from the caller.
    pub async fn create(
        &self,
        actor: &Actor,
        booking_id: &str,
        method: PaymentMethod,
    ) -> DomainResult<Payment> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ensure_self_or_admin(actor, &booking.user_id, "pay for this booking")?;

        if booking.status.is_terminal() {
            return Err(DomainError::InvalidState(format!(
                "Cannot pay for a {} booking",
                booking.status
            )));
        }

        let payment = Payment::new(
            booking.id.clone(),
            booking.user_id.clone(),
            booking.total_price,
            method,
        );
        self.repos.payments().insert_checked(payment.clone()).await?;

        info!(
            payment_id = %payment.id,
            booking_id = %booking_id,
            amount = payment.amount,
            "Payment created"
        );
        Ok(payment)
    }

    /// Complete a pending payment and confirm its booking atomically.
    pub async fn complete(
        &self,
        actor: &Actor,
        payment_id: &str,
        provider_transaction_id: Option<String>,
    ) -> DomainResult<Payment> {
        let mut payment = self.require(payment_id).await?;
        ensure_self_or_admin(actor, &payment.user_id, "complete this payment")?;

        let mut booking = self
            .repos
            .bookings()
            .find_by_id(&payment.booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", &payment.booking_id))?;

        // Both state machines must accept before anything is written.
        booking.apply(BookingEvent::PaymentCompleted)?;
        payment.complete(provider_transaction_id)?;

        self.repos
            .payments()
            .update_with_booking(payment.clone(), booking)
            .await?;

        info!(payment_id = %payment_id, "Payment completed");
        Ok(payment)
    }

    /// Refund a completed payment (full amount) and cancel its booking
    /// atomically.
    pub async fn refund(
        &self,
        actor: &Actor,
        payment_id: &str,
        reason: Option<String>,
    ) -> DomainResult<Payment> {
        let mut payment = self.require(payment_id).await?;
        ensure_self_or_admin(actor, &payment.user_id, "refund this payment")?;

        let mut booking = self
            .repos
            .bookings()
            .find_by_id(&payment.booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", &payment.booking_id))?;

        booking.apply(BookingEvent::PaymentRefunded)?;
        if booking.cancelled_at.is_none() {
            booking.cancelled_at = Some(Utc::now());
            booking.cancellation_reason = reason.clone();
        }
        payment.refund(reason)?;

        self.repos
            .payments()
            .update_with_booking(payment.clone(), booking)
            .await?;

        info!(payment_id = %payment_id, "Payment refunded");
        Ok(payment)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Payment> {
        let payment = self.require(id).await?;
        ensure_self_or_admin(actor, &payment.user_id, "view this payment")?;
        Ok(payment)
    }

    pub async fn list_mine(
        &self,
        actor: &Actor,
        status: Option<PaymentStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Payment>, u64)> {
        self.repos
            .payments()
            .find_by_user(&actor.id, status, page, limit)
            .await
    }

    async fn require(&self, id: &str) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_repos, seed_booking, seed_space};
    use crate::domain::booking::{BookingPaymentStatus, BookingStatus};
    use crate::domain::user::UserRole;

    fn renter() -> Actor {
        Actor::new("renter-1", UserRole::User)
    }

    #[tokio::test]
    async fn amount_is_copied_from_booking() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos);

        let payment = svc
            .create(&renter(), &booking.id, PaymentMethod::KakaoPay)
            .await
            .unwrap();
        assert_eq!(payment.amount, booking.total_price);
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn second_active_payment_conflicts() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos);

        svc.create(&renter(), &booking.id, PaymentMethod::KakaoPay)
            .await
            .unwrap();
        let err = svc
            .create(&renter(), &booking.id, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn stranger_cannot_pay_for_booking() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos);

        let stranger = Actor::new("somebody", UserRole::User);
        let err = svc
            .create(&stranger, &booking.id, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn complete_cascades_to_booking() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos.clone());

        let payment = svc
            .create(&renter(), &booking.id, PaymentMethod::Toss)
            .await
            .unwrap();
        let completed = svc
            .complete(&renter(), &payment.id, Some("toss-123".into()))
            .await
            .unwrap();
        assert_eq!(completed.status, PaymentStatus::Completed);
        assert!(completed.paid_at.is_some());

        let booking = repos
            .bookings()
            .find_by_id(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, BookingPaymentStatus::Paid);
    }

    #[tokio::test]
    async fn refund_cancels_booking_and_records_refund() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos.clone());

        let payment = svc
            .create(&renter(), &booking.id, PaymentMethod::Card)
            .await
            .unwrap();
        svc.complete(&renter(), &payment.id, None).await.unwrap();
        let refunded = svc
            .refund(&renter(), &payment.id, Some("plans changed".into()))
            .await
            .unwrap();

        assert_eq!(refunded.status, PaymentStatus::Refunded);
        let refund = refunded.refund.unwrap();
        assert_eq!(refund.amount, booking.total_price);

        let booking = repos
            .bookings()
            .find_by_id(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.payment_status, BookingPaymentStatus::Refunded);
        assert!(booking.cancelled_at.is_some());
    }

    #[tokio::test]
    async fn refund_of_pending_payment_fails_and_leaves_booking_untouched() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos.clone());

        let payment = svc
            .create(&renter(), &booking.id, PaymentMethod::Card)
            .await
            .unwrap();
        let err = svc.refund(&renter(), &payment.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        let booking = repos
            .bookings()
            .find_by_id(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn cannot_pay_for_cancelled_booking() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Cancelled).await;
        let svc = PaymentService::new(repos);

        let err = svc
            .create(&renter(), &booking.id, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn payment_detail_is_private_to_payer_and_admin() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "renter-1", &space.id, BookingStatus::Pending).await;
        let svc = PaymentService::new(repos);

        let payment = svc
            .create(&renter(), &booking.id, PaymentMethod::Card)
            .await
            .unwrap();

        let admin = Actor::new("admin-1", UserRole::Admin);
        svc.get(&admin, &payment.id).await.unwrap();

        let stranger = Actor::new("nosy", UserRole::User);
        let err = svc.get(&stranger, &payment.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
