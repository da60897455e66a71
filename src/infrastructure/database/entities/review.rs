//! Review entity
//!
//! `booking_id` carries a unique index: one review per booking.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub parking_space_id: String,

    #[sea_orm(unique)]
    pub booking_id: String,

    pub user_id: String,

    pub rating: i32,
    pub comment: String,

    /// JSON array of image URLs
    pub images: String,

    /// Derived helpful-vote counter; the vote rows are authoritative
    pub helpful: i32,

    #[sea_orm(nullable)]
    pub response_text: Option<String>,

    #[sea_orm(nullable)]
    pub responded_at: Option<DateTimeUtc>,

    pub is_visible: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parking_space::Entity",
        from = "Column::ParkingSpaceId",
        to = "super::parking_space::Column::Id"
    )]
    ParkingSpace,
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    #[sea_orm(has_many = "super::review_vote::Entity")]
    Votes,
}

impl Related<super::parking_space::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpace.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::review_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
