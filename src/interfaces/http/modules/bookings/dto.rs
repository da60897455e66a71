//! Request/response DTOs for bookings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::NewBooking;
use crate::domain::booking::{Booking, BookingStatus, VehicleInfo};

/// Vehicle identification attached to a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VehicleInfoDto {
    #[validate(length(min = 1, max = 20, message = "License plate is required"))]
    pub license_plate: String,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 30))]
    pub color: Option<String>,
}

impl From<VehicleInfo> for VehicleInfoDto {
    fn from(v: VehicleInfo) -> Self {
        Self {
            license_plate: v.license_plate,
            model: v.model,
            color: v.color,
        }
    }
}

impl From<VehicleInfoDto> for VehicleInfo {
    fn from(v: VehicleInfoDto) -> Self {
        Self {
            license_plate: v.license_plate,
            model: v.model,
            color: v.color,
        }
    }
}

/// Create a booking for a time window
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "Parking space ID is required"))]
    pub parking_space_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(nested)]
    pub vehicle: VehicleInfoDto,
    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
}

impl From<CreateBookingRequest> for NewBooking {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            parking_space_id: r.parking_space_id,
            start_time: r.start_time,
            end_time: r.end_time,
            vehicle: r.vehicle.into(),
            special_requests: r.special_requests,
        }
    }
}

/// Optional cancellation reason
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Status filter for booking listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsParams {
    /// One of: pending, confirmed, in_progress, completed, cancelled
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Booking details
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub user_id: String,
    pub parking_space_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: i64,
    pub total_price: i64,
    pub status: String,
    pub payment_status: String,
    pub vehicle: VehicleInfoDto,
    pub special_requests: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            parking_space_id: b.parking_space_id,
            start_time: b.start_time,
            end_time: b.end_time,
            duration_hours: b.duration_hours,
            total_price: b.total_price,
            status: b.status.as_str().to_string(),
            payment_status: b.payment_status.as_str().to_string(),
            vehicle: b.vehicle.into(),
            special_requests: b.special_requests,
            cancellation_reason: b.cancellation_reason,
            cancelled_at: b.cancelled_at,
            created_at: b.created_at,
        }
    }
}

pub(super) fn parse_status(s: Option<&str>) -> Option<BookingStatus> {
    s.map(BookingStatus::from_str)
}
