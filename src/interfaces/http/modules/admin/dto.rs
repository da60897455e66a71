//! Request/response DTOs for admin operations

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::PlatformStats;

/// Platform-wide counters for the admin dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStatsDto {
    pub users: u64,
    pub spaces: u64,
    pub bookings: u64,
    pub payments: u64,
    /// Sum of completed payment amounts, in whole KRW
    pub total_revenue: i64,
}

impl From<PlatformStats> for PlatformStatsDto {
    fn from(s: PlatformStats) -> Self {
        Self {
            users: s.users,
            spaces: s.spaces,
            bookings: s.bookings,
            payments: s.payments,
            total_revenue: s.total_revenue,
        }
    }
}

/// Change a user's role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetUserRoleRequest {
    /// One of: user, provider, admin
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

/// Moderate a listing's status
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetSpaceStatusRequest {
    pub is_active: Option<bool>,
    /// One of: available, occupied, unavailable
    pub availability: Option<String>,
}
