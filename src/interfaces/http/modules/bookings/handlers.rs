//! Booking handlers: creation, lifecycle, listings

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::BookingService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::{
    parse_status, BookingDto, CancelBookingRequest, CreateBookingRequest, ListBookingsParams,
};

/// Shared state for booking handlers
#[derive(Clone)]
pub struct BookingHandlerState {
    pub bookings: Arc<BookingService>,
}

/// Book a parking space for a time window
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Pending booking created", body = ApiResponse<BookingDto>),
        (status = 400, description = "Time window conflict or invalid window"),
        (status = 404, description = "Unknown parking space"),
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state.bookings.create(&user.actor(), body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(booking.into())),
    ))
}

/// The caller's bookings, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(ListBookingsParams),
    responses(
        (status = 200, description = "Own bookings", body = ApiResponse<PaginatedResponse<BookingDto>>),
    )
)]
pub async fn list_my_bookings(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListBookingsParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<BookingDto>>>> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(50);
    let status = parse_status(params.status.as_deref());
    let (bookings, total) = state
        .bookings
        .list_mine(&user.actor(), status, page, limit)
        .await?;
    let items: Vec<BookingDto> = bookings.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Booking detail for the renter, the space owner or an admin
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 403, description = "Caller is not involved in this booking"),
        (status = 404, description = "Unknown booking"),
    )
)]
pub async fn get_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.bookings.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

/// Cancel a booking (renter or admin)
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 400, description = "Booking already reached a terminal state"),
        (status = 403, description = "Caller may not cancel this booking"),
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Option<Json<CancelBookingRequest>>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let reason = body.and_then(|Json(b)| b.reason);
    let booking = state.bookings.cancel(&user.actor(), &id, reason).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

/// Confirm a pending booking (space owner or admin)
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/confirm",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Booking is not pending, or the window is now taken"),
        (status = 403, description = "Caller does not own the parking space"),
    )
)]
pub async fn confirm_booking(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.bookings.confirm(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

/// Bookings across all of the caller's listings (provider dashboard)
#[utoipa::path(
    get,
    path = "/api/v1/bookings/my-spaces",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings for owned listings", body = ApiResponse<Vec<BookingDto>>),
        (status = 403, description = "Caller is not a provider"),
    )
)]
pub async fn list_bookings_for_my_spaces(
    State(state): State<BookingHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<Vec<BookingDto>>>> {
    let bookings = state.bookings.list_for_my_spaces(&user.actor()).await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(Into::into).collect(),
    )))
}
