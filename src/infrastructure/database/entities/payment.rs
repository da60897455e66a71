//! Payment entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub booking_id: String,
    pub user_id: String,

    pub amount: i64,

    /// Method: kakao_pay, toss, card, bank_transfer
    pub method: String,

    /// Status: pending, completed, failed, refunded, cancelled
    pub status: String,

    #[sea_orm(unique)]
    pub transaction_id: String,

    #[sea_orm(nullable)]
    pub provider_transaction_id: Option<String>,

    #[sea_orm(nullable)]
    pub refund_amount: Option<i64>,

    #[sea_orm(nullable)]
    pub refund_reason: Option<String>,

    #[sea_orm(nullable)]
    pub refunded_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub paid_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
