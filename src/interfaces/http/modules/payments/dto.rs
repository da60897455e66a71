//! Request/response DTOs for payments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus, Refund};
use crate::domain::{DomainError, DomainResult};

/// Create a pending payment for a booking. The amount comes from the
/// booking, never from the caller.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, message = "Booking ID is required"))]
    pub booking_id: String,
    /// One of: kakao_pay, toss, card, bank_transfer
    pub method: String,
}

impl CreatePaymentRequest {
    pub fn parse_method(&self) -> DomainResult<PaymentMethod> {
        PaymentMethod::from_str(&self.method)
            .ok_or_else(|| DomainError::Validation(format!("Unknown payment method '{}'", self.method)))
    }
}

/// Complete a pending payment
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CompletePaymentRequest {
    /// Reference assigned by the external payment provider
    #[validate(length(max = 100))]
    pub provider_transaction_id: Option<String>,
}

/// Refund a completed payment (always the full amount)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RefundPaymentRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Status filter for payment listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPaymentsParams {
    /// One of: pending, completed, failed, refunded, cancelled
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Refund details, present once a payment has been refunded
#[derive(Debug, Serialize, ToSchema)]
pub struct RefundDto {
    pub amount: i64,
    pub reason: Option<String>,
    pub refunded_at: DateTime<Utc>,
}

impl From<Refund> for RefundDto {
    fn from(r: Refund) -> Self {
        Self {
            amount: r.amount,
            reason: r.reason,
            refunded_at: r.refunded_at,
        }
    }
}

/// Payment details
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub amount: i64,
    pub method: String,
    pub status: String,
    pub transaction_id: String,
    pub provider_transaction_id: Option<String>,
    pub refund: Option<RefundDto>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            booking_id: p.booking_id,
            user_id: p.user_id,
            amount: p.amount,
            method: p.method.as_str().to_string(),
            status: p.status.as_str().to_string(),
            transaction_id: p.transaction_id,
            provider_transaction_id: p.provider_transaction_id,
            refund: p.refund.map(Into::into),
            paid_at: p.paid_at,
            created_at: p.created_at,
        }
    }
}

pub(super) fn parse_status(s: Option<&str>) -> Option<PaymentStatus> {
    s.map(PaymentStatus::from_str)
}
