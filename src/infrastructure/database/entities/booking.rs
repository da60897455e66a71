//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,
    pub parking_space_id: String,

    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    pub duration_hours: i64,
    pub total_price: i64,

    /// Status: pending, confirmed, in_progress, completed, cancelled
    pub status: String,

    /// Payment status: pending, paid, refunded, failed
    pub payment_status: String,

    pub vehicle_license_plate: String,

    #[sea_orm(nullable)]
    pub vehicle_model: Option<String>,

    #[sea_orm(nullable)]
    pub vehicle_color: Option<String>,

    #[sea_orm(nullable)]
    pub special_requests: Option<String>,

    #[sea_orm(nullable)]
    pub cancellation_reason: Option<String>,

    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::parking_space::Entity",
        from = "Column::ParkingSpaceId",
        to = "super::parking_space::Column::Id"
    )]
    ParkingSpace,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::parking_space::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
