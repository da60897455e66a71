//! Admin handlers. Role enforcement happens in the services; these wrappers
//! only translate between HTTP and the domain.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::application::services::{AdminService, ReviewService};
use crate::domain::parking_space::Availability;
use crate::domain::user::UserRole;
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, EmptyData, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::UserDto;
use crate::interfaces::http::modules::bookings::BookingDto;
use crate::interfaces::http::modules::payments::PaymentDto;
use crate::interfaces::http::modules::reviews::{ReviewDto, SetReviewVisibilityRequest};
use crate::interfaces::http::modules::spaces::SpaceDto;

use super::dto::{PlatformStatsDto, SetSpaceStatusRequest, SetUserRoleRequest};

/// Shared state for admin handlers
#[derive(Clone)]
pub struct AdminHandlerState {
    pub admin: Arc<AdminService>,
    pub reviews: Arc<ReviewService>,
}

/// Platform statistics
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Platform counters", body = ApiResponse<PlatformStatsDto>),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn platform_stats(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<PlatformStatsDto>>> {
    let stats = state.admin.stats(&user.actor()).await?;
    Ok(Json(ApiResponse::success(stats.into())))
}

/// All user accounts
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "User accounts", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_users(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<UserDto>>>> {
    let (users, total) = state
        .admin
        .list_users(&user.actor(), params.page, params.limit)
        .await?;
    let items: Vec<UserDto> = users.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    ))))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = SetUserRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<EmptyData>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown user"),
    )
)]
pub async fn set_user_role(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<SetUserRoleRequest>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    let role = UserRole::from_str(&body.role);
    state.admin.set_user_role(&user.actor(), &id, role).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Deactivate a user account
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deactivated", body = ApiResponse<EmptyData>),
        (status = 400, description = "Admins cannot deactivate themselves"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn deactivate_user(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.admin.deactivate_user(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// All listings, active or not
#[utoipa::path(
    get,
    path = "/api/v1/admin/spaces",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "All listings", body = ApiResponse<PaginatedResponse<SpaceDto>>),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_spaces(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<SpaceDto>>>> {
    let (spaces, total) = state
        .admin
        .list_spaces(&user.actor(), params.page, params.limit)
        .await?;
    let items: Vec<SpaceDto> = spaces.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    ))))
}

/// Moderate a listing's status
#[utoipa::path(
    put,
    path = "/api/v1/admin/spaces/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking space ID")),
    request_body = SetSpaceStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<EmptyData>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown listing"),
    )
)]
pub async fn set_space_status(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<SetSpaceStatusRequest>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    let availability = body.availability.as_deref().map(Availability::from_str);
    state
        .admin
        .set_space_status(&user.actor(), &id, body.is_active, availability)
        .await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// All bookings
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "All bookings", body = ApiResponse<PaginatedResponse<BookingDto>>),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_bookings(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<BookingDto>>>> {
    let (bookings, total) = state
        .admin
        .list_bookings(&user.actor(), params.page, params.limit)
        .await?;
    let items: Vec<BookingDto> = bookings.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    ))))
}

/// All payments
#[utoipa::path(
    get,
    path = "/api/v1/admin/payments",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "All payments", body = ApiResponse<PaginatedResponse<PaymentDto>>),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_payments(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<PaymentDto>>>> {
    let (payments, total) = state
        .admin
        .list_payments(&user.actor(), params.page, params.limit)
        .await?;
    let items: Vec<PaymentDto> = payments.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    ))))
}

/// Show or hide a review; the space aggregate is recomputed either way
#[utoipa::path(
    put,
    path = "/api/v1/admin/reviews/{id}/visibility",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Review ID")),
    request_body = SetReviewVisibilityRequest,
    responses(
        (status = 200, description = "Visibility changed", body = ApiResponse<ReviewDto>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown review"),
    )
)]
pub async fn set_review_visibility(
    State(state): State<AdminHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<SetReviewVisibilityRequest>,
) -> ApiResult<Json<ApiResponse<ReviewDto>>> {
    let review = state
        .reviews
        .set_visibility(&user.actor(), &id, body.is_visible)
        .await?;
    Ok(Json(ApiResponse::success(review.into())))
}
