//! Review handlers: creation, moderation, helpful votes, owner responses

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::ReviewService;
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, EmptyData, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::{
    CreateReviewRequest, HelpfulVoteResponse, RespondToReviewRequest, ReviewDto,
    UpdateReviewRequest,
};

/// Shared state for review handlers
#[derive(Clone)]
pub struct ReviewHandlerState {
    pub reviews: Arc<ReviewService>,
}

/// Review a completed booking
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Booking not completed, or already reviewed"),
        (status = 403, description = "Caller is not the booking's renter"),
        (status = 404, description = "Unknown booking"),
    )
)]
pub async fn create_review(
    State(state): State<ReviewHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReviewDto>>)> {
    let review = state.reviews.create(&user.actor(), body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(review.into())),
    ))
}

/// Visible reviews for a parking space (public)
#[utoipa::path(
    get,
    path = "/api/v1/reviews/space/{space_id}",
    tag = "Reviews",
    params(
        ("space_id" = String, Path, description = "Parking space ID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Visible reviews", body = ApiResponse<PaginatedResponse<ReviewDto>>),
    )
)]
pub async fn list_reviews_for_space(
    State(state): State<ReviewHandlerState>,
    Path(space_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<ReviewDto>>>> {
    let (reviews, total) = state
        .reviews
        .list_for_space(&space_id, params.page, params.limit)
        .await?;
    let items: Vec<ReviewDto> = reviews.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    ))))
}

/// The caller's reviews, hidden ones included
#[utoipa::path(
    get,
    path = "/api/v1/reviews/my",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own reviews", body = ApiResponse<Vec<ReviewDto>>),
    )
)]
pub async fn list_my_reviews(
    State(state): State<ReviewHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<Vec<ReviewDto>>>> {
    let reviews = state.reviews.list_mine(&user.actor()).await?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(Into::into).collect(),
    )))
}

/// Edit a review (author only); the space aggregate is recomputed
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewDto>),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Unknown review"),
    )
)]
pub async fn update_review(
    State(state): State<ReviewHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateReviewRequest>,
) -> ApiResult<Json<ApiResponse<ReviewDto>>> {
    let review = state
        .reviews
        .update(&user.actor(), &id, body.into())
        .await?;
    Ok(Json(ApiResponse::success(review.into())))
}

/// Hide a review (author or admin); it stops counting toward the aggregate
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review hidden", body = ApiResponse<EmptyData>),
        (status = 403, description = "Caller may not hide this review"),
        (status = 404, description = "Unknown review"),
    )
)]
pub async fn delete_review(
    State(state): State<ReviewHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.reviews.hide(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Toggle the caller's helpful vote on a review
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/helpful",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Vote toggled", body = ApiResponse<HelpfulVoteResponse>),
        (status = 404, description = "Unknown review"),
    )
)]
pub async fn toggle_helpful_vote(
    State(state): State<ReviewHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<HelpfulVoteResponse>>> {
    let (review, voted) = state.reviews.mark_helpful(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(HelpfulVoteResponse {
        review: review.into(),
        voted,
    })))
}

/// Reply to a review (space owner or admin)
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/response",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Review ID")),
    request_body = RespondToReviewRequest,
    responses(
        (status = 200, description = "Response recorded", body = ApiResponse<ReviewDto>),
        (status = 403, description = "Caller does not own the parking space"),
        (status = 404, description = "Unknown review"),
    )
)]
pub async fn respond_to_review(
    State(state): State<ReviewHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<RespondToReviewRequest>,
) -> ApiResult<Json<ApiResponse<ReviewDto>>> {
    let review = state.reviews.respond(&user.actor(), &id, body.text).await?;
    Ok(Json(ApiResponse::success(review.into())))
}
