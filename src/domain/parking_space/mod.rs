//! Parking space domain: listing entity, search query and repository interface

mod model;
mod repository;

pub use model::{
    haversine_m, Availability, ParkingSpace, Price, Rating, SpaceSize, SpaceType, TimeSlot,
    ALLOWED_FEATURES,
};
pub use repository::{GeoFilter, ParkingSpaceRepository, SpaceQuery};
