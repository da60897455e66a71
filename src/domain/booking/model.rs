//! Booking domain entity and pricing

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "confirmed" => Self::Confirmed,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// Terminal states accept no further lifecycle events
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Statuses that block other bookings on the same space
    pub fn blocks_schedule(&self) -> bool {
        matches!(self, Self::Confirmed | Self::InProgress)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status mirrored on the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl BookingPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "paid" => Self::Paid,
            "refunded" => Self::Refunded,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Vehicle identification attached to a booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInfo {
    pub license_plate: String,
    pub model: Option<String>,
    pub color: Option<String>,
}

/// A reservation of a parking space for a half-open time interval
/// `[start_time, end_time)`.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub parking_space_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Billed whole hours, ceiling of the elapsed time
    pub duration_hours: i64,
    pub total_price: i64,
    pub status: BookingStatus,
    pub payment_status: BookingPaymentStatus,
    pub vehicle: VehicleInfo,
    pub special_requests: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a pending booking, computing duration and price.
    pub fn new(
        user_id: impl Into<String>,
        parking_space_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        hourly_price: i64,
        vehicle: VehicleInfo,
        special_requests: Option<String>,
    ) -> DomainResult<Self> {
        let (duration_hours, total_price) = quote(start_time, end_time, hourly_price)?;
        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            parking_space_id: parking_space_id.into(),
            start_time,
            end_time,
            duration_hours,
            total_price,
            status: BookingStatus::Pending,
            payment_status: BookingPaymentStatus::Pending,
            vehicle,
            special_requests,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether this booking's interval overlaps `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        intervals_overlap(self.start_time, self.end_time, start, end)
    }
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// Back-to-back bookings (one ending exactly when the next starts) do not
/// overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Compute (billed hours, total price) for a time window.
///
/// Duration rounds up to whole hours: 1.1 elapsed hours bills as 2.
/// `start >= end` is rejected.
pub fn quote(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_price: i64,
) -> DomainResult<(i64, i64)> {
    if start >= end {
        return Err(DomainError::Validation(
            "End time must be after start time".into(),
        ));
    }
    if hourly_price < 0 {
        return Err(DomainError::Validation(
            "Hourly price must not be negative".into(),
        ));
    }
    let seconds = (end - start).num_seconds();
    let hours = (seconds + 3599) / 3600;
    Ok((hours, hours * hourly_price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
    }

    fn sample_vehicle() -> VehicleInfo {
        VehicleInfo {
            license_plate: "12가3456".into(),
            model: Some("Avante".into()),
            color: None,
        }
    }

    #[test]
    fn quote_rounds_partial_hours_up() {
        // 10:00-11:30 at 5000/h bills 2 hours = 10000
        let (hours, total) = quote(at(10, 0), at(11, 30), 5000).unwrap();
        assert_eq!(hours, 2);
        assert_eq!(total, 10000);
    }

    #[test]
    fn quote_exact_hours_are_not_padded() {
        let (hours, total) = quote(at(10, 0), at(13, 0), 2000).unwrap();
        assert_eq!(hours, 3);
        assert_eq!(total, 6000);
    }

    #[test]
    fn quote_one_minute_bills_one_hour() {
        let (hours, _) = quote(at(10, 0), at(10, 1), 5000).unwrap();
        assert_eq!(hours, 1);
    }

    #[test]
    fn quote_rejects_empty_interval() {
        let err = quote(at(10, 0), at(10, 0), 5000).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn quote_rejects_reversed_interval() {
        assert!(quote(at(11, 0), at(10, 0), 5000).is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        // [10,12) vs [12,14): touching endpoints do not overlap
        assert!(!intervals_overlap(at(10, 0), at(12, 0), at(12, 0), at(14, 0)));
        assert!(!intervals_overlap(at(12, 0), at(14, 0), at(10, 0), at(12, 0)));
    }

    #[test]
    fn overlap_detects_partial_and_containment() {
        assert!(intervals_overlap(at(10, 0), at(12, 0), at(11, 0), at(13, 0)));
        assert!(intervals_overlap(at(10, 0), at(14, 0), at(11, 0), at(12, 0)));
        assert!(intervals_overlap(at(11, 0), at(12, 0), at(10, 0), at(14, 0)));
        assert!(intervals_overlap(at(10, 0), at(12, 0), at(10, 0), at(12, 0)));
    }

    #[test]
    fn overlap_matches_bruteforce_on_random_intervals() {
        // Property check of the predicate against minute-level set intersection
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((seed >> 33) % (24 * 60)) as i64
        };
        let base = at(0, 0);
        for _ in 0..500 {
            let (mut a, mut b, mut c, mut d) = (next(), next(), next(), next());
            if a == b || c == d {
                continue;
            }
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            if c > d {
                std::mem::swap(&mut c, &mut d);
            }
            let (s1, e1) = (base + Duration::minutes(a), base + Duration::minutes(b));
            let (s2, e2) = (base + Duration::minutes(c), base + Duration::minutes(d));
            let brute = a.max(c) < b.min(d);
            assert_eq!(intervals_overlap(s1, e1, s2, e2), brute);
        }
    }

    #[test]
    fn new_booking_starts_pending() {
        let b = Booking::new(
            "u1",
            "sp1",
            at(10, 0),
            at(11, 30),
            5000,
            sample_vehicle(),
            None,
        )
        .unwrap();
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.payment_status, BookingPaymentStatus::Pending);
        assert_eq!(b.duration_hours, 2);
        assert_eq!(b.total_price, 10000);
    }

    #[test]
    fn status_roundtrip() {
        for s in &[
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(&BookingStatus::from_str(s.as_str()), s);
        }
    }

    #[test]
    fn only_confirmed_and_in_progress_block_schedule() {
        assert!(BookingStatus::Confirmed.blocks_schedule());
        assert!(BookingStatus::InProgress.blocks_schedule());
        assert!(!BookingStatus::Pending.blocks_schedule());
        assert!(!BookingStatus::Completed.blocks_schedule());
        assert!(!BookingStatus::Cancelled.blocks_schedule());
    }
}
