//! SeaORM implementation of ReviewRepository
//!
//! One review per booking is enforced by the unique index on booking_id;
//! helpful votes are rows in review_votes and the counter on the review is
//! adjusted in the same transaction as the vote row.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::domain::review::{OwnerResponse, Review, ReviewRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{review, review_vote};

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: review::Model) -> Review {
    let response = match (m.response_text, m.responded_at) {
        (Some(text), Some(responded_at)) => Some(OwnerResponse { text, responded_at }),
        _ => None,
    };
    Review {
        id: m.id,
        parking_space_id: m.parking_space_id,
        booking_id: m.booking_id,
        user_id: m.user_id,
        rating: m.rating,
        comment: m.comment,
        images: serde_json::from_str(&m.images).unwrap_or_default(),
        helpful: m.helpful,
        response,
        is_visible: m.is_visible,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(r: Review) -> review::ActiveModel {
    let (response_text, responded_at) = match r.response {
        Some(resp) => (Some(resp.text), Some(resp.responded_at)),
        None => (None, None),
    };
    review::ActiveModel {
        id: Set(r.id),
        parking_space_id: Set(r.parking_space_id),
        booking_id: Set(r.booking_id),
        user_id: Set(r.user_id),
        rating: Set(r.rating),
        comment: Set(r.comment),
        images: Set(serde_json::to_string(&r.images).unwrap_or_else(|_| "[]".into())),
        helpful: Set(r.helpful),
        response_text: Set(response_text),
        responded_at: Set(responded_at),
        is_visible: Set(r.is_visible),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── ReviewRepository impl ───────────────────────────────────────

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn insert(&self, r: Review) -> DomainResult<()> {
        debug!("Inserting review {} for booking {}", r.id, r.booking_id);

        domain_to_active(r).insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DomainError::Conflict("This booking has already been reviewed".into())
            } else {
                db_err(e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>> {
        let model = review::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_booking(&self, booking_id: &str) -> DomainResult<Option<Review>> {
        let model = review::Entity::find()
            .filter(review::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, r: Review) -> DomainResult<()> {
        debug!("Updating review: {}", r.id);

        let existing = review::Entity::find_by_id(&r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Review", r.id));
        }

        domain_to_active(r).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_visible_for_space(
        &self,
        parking_space_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Review>, u64)> {
        let paginator = review::Entity::find()
            .filter(review::Column::ParkingSpaceId.eq(parking_space_id))
            .filter(review::Column::IsVisible.eq(true))
            .order_by_desc(review::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Review>> {
        let models = review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn visible_ratings(&self, parking_space_id: &str) -> DomainResult<Vec<i32>> {
        let ratings: Vec<i32> = review::Entity::find()
            .filter(review::Column::ParkingSpaceId.eq(parking_space_id))
            .filter(review::Column::IsVisible.eq(true))
            .select_only()
            .column(review::Column::Rating)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(ratings)
    }

    async fn toggle_helpful(&self, review_id: &str, user_id: &str) -> DomainResult<(Review, bool)> {
        debug!("Toggling helpful vote on review {} by {}", review_id, user_id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = review::Entity::find_by_id(review_id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::not_found("Review", review_id));
        };

        let vote = review_vote::Entity::find()
            .filter(review_vote::Column::ReviewId.eq(review_id))
            .filter(review_vote::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(db_err)?;

        let (next_helpful, voted) = match vote {
            Some(vote) => {
                vote.delete(&txn).await.map_err(db_err)?;
                ((existing.helpful - 1).max(0), false)
            }
            None => {
                let row = review_vote::ActiveModel {
                    id: Set(uuid::Uuid::new_v4().to_string()),
                    review_id: Set(review_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    created_at: Set(Utc::now()),
                };
                row.insert(&txn).await.map_err(db_err)?;
                (existing.helpful + 1, true)
            }
        };

        let mut active: review::ActiveModel = existing.into();
        active.helpful = Set(next_helpful);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok((model_to_domain(updated), voted))
    }

    async fn set_visibility(&self, review_id: &str, visible: bool) -> DomainResult<Review> {
        let existing = review::Entity::find_by_id(review_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Review", review_id))?;

        let mut active: review::ActiveModel = existing.into();
        active.is_visible = Set(visible);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }
}
