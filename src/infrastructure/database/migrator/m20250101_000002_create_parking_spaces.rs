//! Create parking_spaces table
//!
//! Longitude/latitude columns are indexed for the bounding-box predicate
//! behind radius search.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSpaces::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingSpaces::OwnerId).string().not_null())
                    .col(ColumnDef::new(ParkingSpaces::Title).string().not_null())
                    .col(
                        ColumnDef::new(ParkingSpaces::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSpaces::Address).string().not_null())
                    .col(
                        ColumnDef::new(ParkingSpaces::Longitude)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSpaces::Latitude).double().not_null())
                    .col(
                        ColumnDef::new(ParkingSpaces::PriceHourly)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSpaces::PriceDaily).big_integer())
                    .col(ColumnDef::new(ParkingSpaces::PriceMonthly).big_integer())
                    .col(
                        ColumnDef::new(ParkingSpaces::Availability)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(ParkingSpaces::SpaceType).string().not_null())
                    .col(
                        ColumnDef::new(ParkingSpaces::SpaceSize)
                            .string()
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::Features)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::Images)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::AvailableTimeSlots)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::RatingAverage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::RatingCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::TotalBookings)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpaces::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_spaces_owner")
                            .from(ParkingSpaces::Table, ParkingSpaces::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spaces_owner")
                    .table(ParkingSpaces::Table)
                    .col(ParkingSpaces::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spaces_availability")
                    .table(ParkingSpaces::Table)
                    .col(ParkingSpaces::Availability)
                    .col(ParkingSpaces::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spaces_location")
                    .table(ParkingSpaces::Table)
                    .col(ParkingSpaces::Longitude)
                    .col(ParkingSpaces::Latitude)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spaces_price")
                    .table(ParkingSpaces::Table)
                    .col(ParkingSpaces::PriceHourly)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpaces::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSpaces {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    Address,
    Longitude,
    Latitude,
    PriceHourly,
    PriceDaily,
    PriceMonthly,
    Availability,
    SpaceType,
    SpaceSize,
    Features,
    Images,
    AvailableTimeSlots,
    RatingAverage,
    RatingCount,
    TotalBookings,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
