//! Request/response DTOs for reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::{NewReview, ReviewUpdate};
use crate::domain::review::{OwnerResponse, Review};

/// Create a review for a completed booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Booking ID is required"))]
    pub booking_id: String,
    /// Integer stars, 1..=5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 1000))]
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(r: CreateReviewRequest) -> Self {
        Self {
            booking_id: r.booking_id,
            rating: r.rating,
            comment: r.comment,
            images: r.images,
        }
    }
}

/// Partial update by the review author
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
    pub images: Option<Vec<String>>,
}

impl From<UpdateReviewRequest> for ReviewUpdate {
    fn from(r: UpdateReviewRequest) -> Self {
        Self {
            rating: r.rating,
            comment: r.comment,
            images: r.images,
        }
    }
}

/// Owner's reply to a review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RespondToReviewRequest {
    #[validate(length(min = 1, max = 1000, message = "Response text is required"))]
    pub text: String,
}

/// Admin moderation toggle
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetReviewVisibilityRequest {
    pub is_visible: bool,
}

/// Owner response details
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerResponseDto {
    pub text: String,
    pub responded_at: DateTime<Utc>,
}

impl From<OwnerResponse> for OwnerResponseDto {
    fn from(r: OwnerResponse) -> Self {
        Self {
            text: r.text,
            responded_at: r.responded_at,
        }
    }
}

/// Review details
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: String,
    pub parking_space_id: String,
    pub booking_id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
    pub images: Vec<String>,
    pub helpful: i32,
    pub response: Option<OwnerResponseDto>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            parking_space_id: r.parking_space_id,
            booking_id: r.booking_id,
            user_id: r.user_id,
            rating: r.rating,
            comment: r.comment,
            images: r.images,
            helpful: r.helpful,
            response: r.response.map(Into::into),
            is_visible: r.is_visible,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Result of a helpful-vote toggle
#[derive(Debug, Serialize, ToSchema)]
pub struct HelpfulVoteResponse {
    pub review: ReviewDto,
    /// Whether the caller's vote is present after the toggle
    pub voted: bool,
}
