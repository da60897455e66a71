//! Request/response DTOs for parking spaces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{NewSpace, SpaceUpdate};
use crate::domain::parking_space::{
    Availability, GeoFilter, ParkingSpace, Price, SpaceQuery, SpaceSize, SpaceType, TimeSlot,
};
use crate::domain::{DomainError, DomainResult};

/// Price tiers in whole KRW
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PriceDto {
    pub hourly: i64,
    pub daily: Option<i64>,
    pub monthly: Option<i64>,
}

impl From<Price> for PriceDto {
    fn from(p: Price) -> Self {
        Self {
            hourly: p.hourly,
            daily: p.daily,
            monthly: p.monthly,
        }
    }
}

impl From<PriceDto> for Price {
    fn from(p: PriceDto) -> Self {
        Self {
            hourly: p.hourly,
            daily: p.daily,
            monthly: p.monthly,
        }
    }
}

/// Weekly recurring availability window
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeSlotDto {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

impl From<TimeSlot> for TimeSlotDto {
    fn from(s: TimeSlot) -> Self {
        Self {
            day_of_week: s.day_of_week,
            start_time: s.start_time,
            end_time: s.end_time,
        }
    }
}

impl From<TimeSlotDto> for TimeSlot {
    fn from(s: TimeSlotDto) -> Self {
        Self {
            day_of_week: s.day_of_week,
            start_time: s.start_time,
            end_time: s.end_time,
        }
    }
}

/// Create a new listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSpaceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 300, message = "Address is required"))]
    pub address: String,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: f64,
    pub price: PriceDto,
    /// One of: outdoor, indoor, covered, garage
    pub space_type: String,
    /// One of: compact, standard, large, xlarge
    #[serde(default)]
    pub space_size: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub available_time_slots: Vec<TimeSlotDto>,
}

impl CreateSpaceRequest {
    pub fn into_domain(self) -> DomainResult<NewSpace> {
        let space_type = parse_space_type(&self.space_type)?;
        Ok(NewSpace {
            title: self.title,
            description: self.description,
            address: self.address,
            longitude: self.longitude,
            latitude: self.latitude,
            price: self.price.into(),
            space_type,
            space_size: SpaceSize::from_str(self.space_size.as_deref().unwrap_or("standard")),
            features: self.features,
            images: self.images,
            available_time_slots: self
                .available_time_slots
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}

/// Partial listing update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSpaceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub address: Option<String>,
    pub price: Option<PriceDto>,
    /// One of: available, occupied, unavailable
    pub availability: Option<String>,
    pub space_type: Option<String>,
    pub space_size: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub available_time_slots: Option<Vec<TimeSlotDto>>,
}

impl UpdateSpaceRequest {
    pub fn into_domain(self) -> DomainResult<SpaceUpdate> {
        let space_type = match self.space_type.as_deref() {
            Some(s) => Some(parse_space_type(s)?),
            None => None,
        };
        Ok(SpaceUpdate {
            title: self.title,
            description: self.description,
            address: self.address,
            price: self.price.map(Into::into),
            availability: self.availability.as_deref().map(Availability::from_str),
            space_type,
            space_size: self.space_size.as_deref().map(SpaceSize::from_str),
            features: self.features,
            images: self.images,
            available_time_slots: self
                .available_time_slots
                .map(|slots| slots.into_iter().map(Into::into).collect()),
        })
    }
}

fn parse_space_type(s: &str) -> DomainResult<SpaceType> {
    SpaceType::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("Unknown space type '{}'", s)))
}

/// Search filters for the public listing endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchSpacesParams {
    /// Latitude of the search center; requires `lng`
    pub lat: Option<f64>,
    /// Longitude of the search center; requires `lat`
    pub lng: Option<f64>,
    /// Search radius in meters, defaults to 1000
    pub radius_m: Option<f64>,
    pub availability: Option<String>,
    pub space_type: Option<String>,
    /// Minimum hourly price
    pub min_price: Option<i64>,
    /// Maximum hourly price
    pub max_price: Option<i64>,
    /// Comma-separated feature list; all must be present
    pub features: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchSpacesParams {
    pub fn into_query(self) -> DomainResult<SpaceQuery> {
        let near = match (self.lat, self.lng) {
            (Some(latitude), Some(longitude)) => Some(GeoFilter {
                longitude,
                latitude,
                radius_m: self.radius_m.unwrap_or(1000.0),
            }),
            (None, None) => None,
            _ => {
                return Err(DomainError::Validation(
                    "Both lat and lng are required for a location search".into(),
                ))
            }
        };
        let space_type = match self.space_type.as_deref() {
            Some(s) => Some(parse_space_type(s)?),
            None => None,
        };
        Ok(SpaceQuery {
            near,
            availability: self.availability.as_deref().map(Availability::from_str),
            space_type,
            min_hourly_price: self.min_price,
            max_hourly_price: self.max_price,
            features: self
                .features
                .map(|csv| {
                    csv.split(',')
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(50),
        })
    }
}

/// Public view of a parking space
#[derive(Debug, Serialize, ToSchema)]
pub struct SpaceDto {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub price: PriceDto,
    pub availability: String,
    pub space_type: String,
    pub space_size: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub available_time_slots: Vec<TimeSlotDto>,
    pub rating_average: f64,
    pub rating_count: u32,
    pub total_bookings: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingSpace> for SpaceDto {
    fn from(s: ParkingSpace) -> Self {
        Self {
            id: s.id,
            owner_id: s.owner_id,
            title: s.title,
            description: s.description,
            address: s.address,
            longitude: s.longitude,
            latitude: s.latitude,
            price: s.price.into(),
            availability: s.availability.as_str().to_string(),
            space_type: s.space_type.as_str().to_string(),
            space_size: s.space_size.as_str().to_string(),
            features: s.features,
            images: s.images,
            available_time_slots: s
                .available_time_slots
                .into_iter()
                .map(Into::into)
                .collect(),
            rating_average: s.rating.average,
            rating_count: s.rating.count,
            total_bookings: s.total_bookings,
            is_active: s.is_active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_params() -> SearchSpacesParams {
        SearchSpacesParams {
            lat: None,
            lng: None,
            radius_m: None,
            availability: None,
            space_type: None,
            min_price: None,
            max_price: None,
            features: None,
            page: None,
            limit: None,
        }
    }

    #[test]
    fn lat_without_lng_is_rejected() {
        let params = SearchSpacesParams {
            lat: Some(37.5),
            ..base_params()
        };
        assert!(matches!(
            params.into_query().unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn features_csv_is_split_and_trimmed() {
        let params = SearchSpacesParams {
            features: Some("cctv, ev_charging ,".into()),
            ..base_params()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.features, vec!["cctv", "ev_charging"]);
    }

    #[test]
    fn geo_search_defaults_radius() {
        let params = SearchSpacesParams {
            lat: Some(37.5),
            lng: Some(127.0),
            ..base_params()
        };
        let near = params.into_query().unwrap().near.unwrap();
        assert_eq!(near.radius_m, 1000.0);
    }

    #[test]
    fn unknown_space_type_is_rejected() {
        let params = SearchSpacesParams {
            space_type: Some("floating".into()),
            ..base_params()
        };
        assert!(params.into_query().is_err());
    }
}
