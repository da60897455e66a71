//! Payment domain entity

use chrono::{DateTime, Utc};
use rand::RngCore;

use crate::domain::{DomainError, DomainResult};

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "refunded" => Self::Refunded,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// A booking may have at most one payment in an active status.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Completed)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    KakaoPay,
    Toss,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KakaoPay => "kakao_pay",
            Self::Toss => "toss",
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kakao_pay" => Some(Self::KakaoPay),
            "toss" => Some(Self::Toss),
            "card" => Some(Self::Card),
            "bank_transfer" => Some(Self::BankTransfer),
            _ => None,
        }
    }
}

/// Refund sub-record, present once a payment has been refunded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
    pub amount: i64,
    pub reason: Option<String>,
    pub refunded_at: DateTime<Utc>,
}

/// A payment for exactly one booking.
///
/// The amount is copied from the booking at creation time, never taken from
/// the caller.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Our unique payment reference ("TXN...")
    pub transaction_id: String,
    /// Reference assigned by the external payment provider
    pub provider_transaction_id: Option<String>,
    pub refund: Option<Refund>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        booking_id: impl Into<String>,
        user_id: impl Into<String>,
        amount: i64,
        method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            booking_id: booking_id.into(),
            user_id: user_id.into(),
            amount,
            method,
            status: PaymentStatus::Pending,
            transaction_id: generate_transaction_id(),
            provider_transaction_id: None,
            refund: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark completed. Only a pending payment can complete.
    pub fn complete(&mut self, provider_transaction_id: Option<String>) -> DomainResult<()> {
        if self.status != PaymentStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "Only pending payments can be completed (status: {})",
                self.status
            )));
        }
        self.status = PaymentStatus::Completed;
        self.provider_transaction_id = provider_transaction_id;
        self.paid_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark refunded for the full amount. Only a completed payment can be
    /// refunded.
    pub fn refund(&mut self, reason: Option<String>) -> DomainResult<()> {
        if self.status != PaymentStatus::Completed {
            return Err(DomainError::InvalidState(format!(
                "Only completed payments can be refunded (status: {})",
                self.status
            )));
        }
        self.status = PaymentStatus::Refunded;
        self.refund = Some(Refund {
            amount: self.amount,
            reason,
            refunded_at: Utc::now(),
        });
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Generate a unique payment reference: "TXN" + millisecond timestamp +
/// 8 random hex chars.
pub fn generate_transaction_id() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!(
        "TXN{}{}",
        Utc::now().timestamp_millis(),
        hex::encode_upper(bytes)
    )
}
