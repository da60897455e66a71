//! Parking space domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability of a space for new bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Occupied,
    Unavailable,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "occupied" => Self::Occupied,
            "unavailable" => Self::Unavailable,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical kind of parking space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    Outdoor,
    Indoor,
    Covered,
    Garage,
}

impl SpaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outdoor => "outdoor",
            Self::Indoor => "indoor",
            Self::Covered => "covered",
            Self::Garage => "garage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "outdoor" => Some(Self::Outdoor),
            "indoor" => Some(Self::Indoor),
            "covered" => Some(Self::Covered),
            "garage" => Some(Self::Garage),
            _ => None,
        }
    }
}

/// Size class of a space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceSize {
    Compact,
    Standard,
    Large,
    Xlarge,
}

impl SpaceSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Large => "large",
            Self::Xlarge => "xlarge",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "compact" => Self::Compact,
            "large" => Self::Large,
            "xlarge" => Self::Xlarge,
            _ => Self::Standard,
        }
    }
}

/// Features a space may advertise
pub const ALLOWED_FEATURES: &[&str] = &[
    "cctv",
    "security",
    "ev_charging",
    "covered",
    "lighting",
    "accessible",
];

/// Price tiers in whole KRW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub hourly: i64,
    pub daily: Option<i64>,
    pub monthly: Option<i64>,
}

/// Weekly recurring availability window ("09:00".."18:00")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

/// Aggregate rating, derived solely from visible reviews
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    /// Mean of visible review ratings, rounded to one decimal, in [0, 5]
    pub average: f64,
    pub count: u32,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }
}

/// A listed parking space, owned by exactly one provider
#[derive(Debug, Clone)]
pub struct ParkingSpace {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub price: Price,
    pub availability: Availability,
    pub space_type: SpaceType,
    pub space_size: SpaceSize,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub available_time_slots: Vec<TimeSlot>,
    pub rating: Rating,
    pub total_bookings: u32,
    /// Soft-delete flag; inactive spaces are hidden from search
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSpace {
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.availability == Availability::Available
    }
}

/// Great-circle distance in meters between two (longitude, latitude) points.
///
/// Replaces the document store's `$near` predicate: candidates are
/// pre-filtered with a bounding box in SQL and the exact distance is
/// checked here.
pub fn haversine_m(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
