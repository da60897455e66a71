//! SeaORM implementation of PaymentRepository
//!
//! Checked inserts enforce at most one active (pending or completed) payment
//! per booking; state changes write the payment and its booking cascade in
//! one transaction.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::booking::Booking;
use crate::domain::payment::{
    Payment, PaymentMethod, PaymentRepository, PaymentStatus, Refund,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, payment};

const ACTIVE_STATUSES: [&str; 2] = ["pending", "completed"];

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: payment::Model) -> Payment {
    let refund = m.refunded_at.map(|refunded_at| Refund {
        amount: m.refund_amount.unwrap_or(0),
        reason: m.refund_reason.clone(),
        refunded_at,
    });
    Payment {
        id: m.id,
        booking_id: m.booking_id,
        user_id: m.user_id,
        amount: m.amount,
        method: PaymentMethod::from_str(&m.method).unwrap_or(PaymentMethod::Card),
        status: PaymentStatus::from_str(&m.status),
        transaction_id: m.transaction_id,
        provider_transaction_id: m.provider_transaction_id,
        refund,
        paid_at: m.paid_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(p: Payment) -> payment::ActiveModel {
    let (refund_amount, refund_reason, refunded_at) = match p.refund {
        Some(r) => (Some(r.amount), r.reason, Some(r.refunded_at)),
        None => (None, None, None),
    };
    payment::ActiveModel {
        id: Set(p.id),
        booking_id: Set(p.booking_id),
        user_id: Set(p.user_id),
        amount: Set(p.amount),
        method: Set(p.method.as_str().to_string()),
        status: Set(p.status.as_str().to_string()),
        transaction_id: Set(p.transaction_id),
        provider_transaction_id: Set(p.provider_transaction_id),
        refund_amount: Set(refund_amount),
        refund_reason: Set(refund_reason),
        refunded_at: Set(refunded_at),
        paid_at: Set(p.paid_at),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── PaymentRepository impl ──────────────────────────────────────

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn insert_checked(&self, p: Payment) -> DomainResult<()> {
        debug!("Inserting payment {} for booking {}", p.id, p.booking_id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let active = payment::Entity::find()
            .filter(payment::Column::BookingId.eq(&p.booking_id))
            .filter(payment::Column::Status.is_in(ACTIVE_STATUSES))
            .one(&txn)
            .await
            .map_err(db_err)?;
        if active.is_some() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::Conflict(
                "An active payment already exists for this booking".into(),
            ));
        }

        domain_to_active(p).insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_for_booking(&self, booking_id: &str) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find()
            .filter(payment::Column::BookingId.eq(booking_id))
            .filter(payment::Column::Status.is_in(ACTIVE_STATUSES))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update_with_booking(&self, p: Payment, b: Booking) -> DomainResult<()> {
        debug!("Updating payment {} with booking {} cascade", p.id, b.id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = payment::Entity::find_by_id(&p.id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::not_found("Payment", p.id));
        }

        domain_to_active(p).update(&txn).await.map_err(db_err)?;

        let booking_update = booking::ActiveModel {
            id: Set(b.id),
            status: Set(b.status.as_str().to_string()),
            payment_status: Set(b.payment_status.as_str().to_string()),
            cancellation_reason: Set(b.cancellation_reason),
            cancelled_at: Set(b.cancelled_at),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        booking_update.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        status: Option<PaymentStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Payment>, u64)> {
        let mut select = payment::Entity::find().filter(payment::Column::UserId.eq(user_id));
        if let Some(status) = status {
            select = select.filter(payment::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(payment::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<Payment>, u64)> {
        let paginator = payment::Entity::find()
            .order_by_desc(payment::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn total_revenue(&self) -> DomainResult<i64> {
        let total: Option<Option<i64>> = payment::Entity::find()
            .filter(payment::Column::Status.eq("completed"))
            .select_only()
            .column_as(Expr::col(payment::Column::Amount).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(total.flatten().unwrap_or(0))
    }

    async fn count(&self) -> DomainResult<u64> {
        payment::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
