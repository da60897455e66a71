//! Booking state machine
//!
//! All status changes go through one transition table keyed by
//! (current status, event). Payment completion and refund reach the booking
//! only as events here, so the payment→booking cascade is not scattered
//! across the payment code path.

use chrono::Utc;

use super::model::{Booking, BookingPaymentStatus, BookingStatus};
use crate::domain::{DomainError, DomainResult};

/// Lifecycle events a booking can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    /// Provider (or admin) accepts a pending booking
    Confirm,
    /// Externally driven: parking period began
    Start,
    /// Externally driven: parking period ended
    Complete,
    /// Booking owner (or admin) cancels
    Cancel,
    /// Cascade from the payment lifecycle: payment completed
    PaymentCompleted,
    /// Cascade from the payment lifecycle: payment refunded
    PaymentRefunded,
}

impl BookingEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
            Self::PaymentCompleted => "payment_completed",
            Self::PaymentRefunded => "payment_refunded",
        }
    }
}

/// Outcome of a transition: the next status plus any payment-status side
/// effect to mirror onto the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: BookingStatus,
    pub payment_status: Option<BookingPaymentStatus>,
}

/// The transition table. Any (status, event) pair not listed is rejected
/// with InvalidState.
pub fn transition(current: BookingStatus, event: BookingEvent) -> DomainResult<Transition> {
    use BookingEvent::*;
    use BookingStatus::*;

    let accepted = match (current, event) {
        (Pending, Confirm) => Transition {
            next: Confirmed,
            payment_status: None,
        },
        (Pending | Confirmed, Start) => Transition {
            next: InProgress,
            payment_status: None,
        },
        (Confirmed | InProgress, Complete) => Transition {
            next: Completed,
            payment_status: None,
        },
        (Pending | Confirmed | InProgress, Cancel) => Transition {
            next: Cancelled,
            payment_status: None,
        },
        // Completing payment confirms the booking, even from in_progress.
        (Pending | Confirmed | InProgress, PaymentCompleted) => Transition {
            next: Confirmed,
            payment_status: Some(BookingPaymentStatus::Paid),
        },
        (Pending | Confirmed | InProgress, PaymentRefunded) => Transition {
            next: Cancelled,
            payment_status: Some(BookingPaymentStatus::Refunded),
        },
        // Refunding an already-cancelled booking only moves the payment flag.
        (Cancelled, PaymentRefunded) => Transition {
            next: Cancelled,
            payment_status: Some(BookingPaymentStatus::Refunded),
        },
        _ => {
            return Err(DomainError::InvalidState(format!(
                "Cannot {} a {} booking",
                event.as_str(),
                current
            )))
        }
    };
    Ok(accepted)
}

impl Booking {
    /// Apply a lifecycle event, mutating status and payment status per the
    /// transition table.
    pub fn apply(&mut self, event: BookingEvent) -> DomainResult<()> {
        let t = transition(self.status, event)?;
        self.status = t.next;
        if let Some(ps) = t.payment_status {
            self.payment_status = ps;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancel with a recorded reason and timestamp.
    pub fn cancel(&mut self, reason: Option<String>) -> DomainResult<()> {
        self.apply(BookingEvent::Cancel)?;
        self.cancellation_reason = reason;
        self.cancelled_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::model::VehicleInfo;
    use chrono::{Duration, Utc};

    fn booking_with(status: BookingStatus) -> Booking {
        let start = Utc::now() + Duration::hours(1);
        let mut b = Booking::new(
            "u1",
            "sp1",
            start,
            start + Duration::hours(2),
            5000,
            VehicleInfo {
                license_plate: "11가1111".into(),
                model: None,
                color: None,
            },
            None,
        )
        .unwrap();
        b.status = status;
        b
    }

    #[test]
    fn confirm_only_from_pending() {
        assert!(transition(BookingStatus::Pending, BookingEvent::Confirm).is_ok());
        for s in &[
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert!(transition(*s, BookingEvent::Confirm).is_err(), "{}", s);
        }
    }

    #[test]
    fn cancel_rejected_in_terminal_states() {
        for s in &[BookingStatus::Completed, BookingStatus::Cancelled] {
            let err = transition(*s, BookingEvent::Cancel).unwrap_err();
            assert!(matches!(err, DomainError::InvalidState(_)));
        }
    }

    #[test]
    fn payment_completion_confirms_and_marks_paid() {
        for s in &[
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
        ] {
            let t = transition(*s, BookingEvent::PaymentCompleted).unwrap();
            assert_eq!(t.next, BookingStatus::Confirmed);
            assert_eq!(t.payment_status, Some(BookingPaymentStatus::Paid));
        }
    }

    #[test]
    fn payment_completion_rejected_on_terminal_booking() {
        assert!(transition(BookingStatus::Cancelled, BookingEvent::PaymentCompleted).is_err());
        assert!(transition(BookingStatus::Completed, BookingEvent::PaymentCompleted).is_err());
    }

    #[test]
    fn refund_cancels_and_marks_refunded() {
        let t = transition(BookingStatus::Confirmed, BookingEvent::PaymentRefunded).unwrap();
        assert_eq!(t.next, BookingStatus::Cancelled);
        assert_eq!(t.payment_status, Some(BookingPaymentStatus::Refunded));
    }

    #[test]
    fn refund_on_cancelled_booking_keeps_it_cancelled() {
        let t = transition(BookingStatus::Cancelled, BookingEvent::PaymentRefunded).unwrap();
        assert_eq!(t.next, BookingStatus::Cancelled);
        assert_eq!(t.payment_status, Some(BookingPaymentStatus::Refunded));
    }

    #[test]
    fn refund_rejected_on_completed_booking() {
        assert!(transition(BookingStatus::Completed, BookingEvent::PaymentRefunded).is_err());
    }

    #[test]
    fn cancel_records_reason_and_timestamp() {
        let mut b = booking_with(BookingStatus::Confirmed);
        b.cancel(Some("change of plans".into())).unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(b.cancellation_reason.as_deref(), Some("change of plans"));
        assert!(b.cancelled_at.is_some());
    }

    #[test]
    fn apply_mirrors_payment_status() {
        let mut b = booking_with(BookingStatus::Pending);
        b.apply(BookingEvent::PaymentCompleted).unwrap();
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.payment_status, BookingPaymentStatus::Paid);
    }

    #[test]
    fn start_and_complete_flow() {
        let mut b = booking_with(BookingStatus::Confirmed);
        b.apply(BookingEvent::Start).unwrap();
        assert_eq!(b.status, BookingStatus::InProgress);
        b.apply(BookingEvent::Complete).unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
        assert!(b.apply(BookingEvent::Start).is_err());
    }
}
