//! Parking space entity
//!
//! List-valued fields (features, images, time slots) are stored as JSON
//! text, mirroring the document-style shape of the records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_spaces")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub owner_id: String,

    pub title: String,
    pub description: String,
    pub address: String,

    pub longitude: f64,
    pub latitude: f64,

    pub price_hourly: i64,

    #[sea_orm(nullable)]
    pub price_daily: Option<i64>,

    #[sea_orm(nullable)]
    pub price_monthly: Option<i64>,

    /// Availability: available, occupied, unavailable
    pub availability: String,

    /// Space type: outdoor, indoor, covered, garage
    pub space_type: String,

    /// Size class: compact, standard, large, xlarge
    pub space_size: String,

    /// JSON array of feature strings
    pub features: String,

    /// JSON array of image URLs
    pub images: String,

    /// JSON array of weekly time slots
    pub available_time_slots: String,

    pub rating_average: f64,
    pub rating_count: i32,

    pub total_bookings: i32,

    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
