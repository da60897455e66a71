//! SeaORM implementation of BookingRepository
//!
//! The overlap invariant is enforced here: checked inserts and confirms run
//! their conflict query and write inside one transaction, so two concurrent
//! requests for the same window cannot both commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::booking::{
    Booking, BookingPaymentStatus, BookingRepository, BookingStatus, VehicleInfo,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

const BLOCKING_STATUSES: [&str; 2] = ["confirmed", "in_progress"];

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        user_id: m.user_id,
        parking_space_id: m.parking_space_id,
        start_time: m.start_time,
        end_time: m.end_time,
        duration_hours: m.duration_hours,
        total_price: m.total_price,
        status: BookingStatus::from_str(&m.status),
        payment_status: BookingPaymentStatus::from_str(&m.payment_status),
        vehicle: VehicleInfo {
            license_plate: m.vehicle_license_plate,
            model: m.vehicle_model,
            color: m.vehicle_color,
        },
        special_requests: m.special_requests,
        cancellation_reason: m.cancellation_reason,
        cancelled_at: m.cancelled_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(b: Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        user_id: Set(b.user_id),
        parking_space_id: Set(b.parking_space_id),
        start_time: Set(b.start_time),
        end_time: Set(b.end_time),
        duration_hours: Set(b.duration_hours),
        total_price: Set(b.total_price),
        status: Set(b.status.as_str().to_string()),
        payment_status: Set(b.payment_status.as_str().to_string()),
        vehicle_license_plate: Set(b.vehicle.license_plate),
        vehicle_model: Set(b.vehicle.model),
        vehicle_color: Set(b.vehicle.color),
        special_requests: Set(b.special_requests),
        cancellation_reason: Set(b.cancellation_reason),
        cancelled_at: Set(b.cancelled_at),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Schedule-blocking bookings of a space whose `[start, end)` interval
/// intersects the given one. Half-open: touching endpoints do not conflict.
async fn conflicts_on<C: ConnectionTrait>(
    conn: &C,
    parking_space_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: Option<&str>,
) -> DomainResult<Vec<booking::Model>> {
    let mut select = booking::Entity::find()
        .filter(booking::Column::ParkingSpaceId.eq(parking_space_id))
        .filter(booking::Column::Status.is_in(BLOCKING_STATUSES))
        .filter(booking::Column::StartTime.lt(end))
        .filter(booking::Column::EndTime.gt(start));
    if let Some(id) = exclude_id {
        select = select.filter(booking::Column::Id.ne(id));
    }
    select.all(conn).await.map_err(db_err)
}

fn overlap_conflict() -> DomainError {
    DomainError::Conflict("Parking space is already booked for this time window".into())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert_checked(&self, b: Booking) -> DomainResult<()> {
        debug!("Inserting booking {} for space {}", b.id, b.parking_space_id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let conflicting =
            conflicts_on(&txn, &b.parking_space_id, b.start_time, b.end_time, None).await?;
        if !conflicting.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Err(overlap_conflict());
        }

        domain_to_active(b).insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, b: Booking) -> DomainResult<()> {
        debug!("Updating booking: {}", b.id);

        let existing = booking::Entity::find_by_id(&b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Booking", b.id));
        }

        domain_to_active(b).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn confirm_checked(&self, b: Booking) -> DomainResult<()> {
        debug!("Confirming booking {} for space {}", b.id, b.parking_space_id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = booking::Entity::find_by_id(&b.id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::not_found("Booking", b.id));
        }

        let conflicting = conflicts_on(
            &txn,
            &b.parking_space_id,
            b.start_time,
            b.end_time,
            Some(&b.id),
        )
        .await?;
        if !conflicting.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Err(overlap_conflict());
        }

        domain_to_active(b).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_conflicting(
        &self,
        parking_space_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let models = conflicts_on(&self.db, parking_space_id, start, end, None).await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        status: Option<BookingStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)> {
        let mut select = booking::Entity::find().filter(booking::Column::UserId.eq(user_id));
        if let Some(status) = status {
            select = select.filter(booking::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn find_for_spaces(&self, space_ids: &[String]) -> DomainResult<Vec<Booking>> {
        if space_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = booking::Entity::find()
            .filter(booking::Column::ParkingSpaceId.is_in(space_ids.iter().cloned()))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<Booking>, u64)> {
        let paginator = booking::Entity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn count(&self) -> DomainResult<u64> {
        booking::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
