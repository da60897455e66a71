//! Payment handlers: creation, completion, refund, listings

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::PaymentService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::{
    parse_status, CompletePaymentRequest, CreatePaymentRequest, ListPaymentsParams, PaymentDto,
    RefundPaymentRequest,
};

/// Shared state for payment handlers
#[derive(Clone)]
pub struct PaymentHandlerState {
    pub payments: Arc<PaymentService>,
}

/// Create a pending payment for a booking
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Pending payment created", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Active payment already exists, or booking is terminal"),
        (status = 403, description = "Caller does not own the booking"),
        (status = 404, description = "Unknown booking"),
    )
)]
pub async fn create_payment(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PaymentDto>>)> {
    let method = body.parse_method()?;
    let payment = state
        .payments
        .create(&user.actor(), &body.booking_id, method)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(payment.into())),
    ))
}

/// The caller's payments, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(ListPaymentsParams),
    responses(
        (status = 200, description = "Own payments", body = ApiResponse<PaginatedResponse<PaymentDto>>),
    )
)]
pub async fn list_my_payments(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListPaymentsParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<PaymentDto>>>> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(50);
    let status = parse_status(params.status.as_deref());
    let (payments, total) = state
        .payments
        .list_mine(&user.actor(), status, page, limit)
        .await?;
    let items: Vec<PaymentDto> = payments.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Payment detail for the payer or an admin
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment details", body = ApiResponse<PaymentDto>),
        (status = 403, description = "Caller is not the payer"),
        (status = 404, description = "Unknown payment"),
    )
)]
pub async fn get_payment(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PaymentDto>>> {
    let payment = state.payments.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}

/// Complete a pending payment; the booking is confirmed in the same
/// transaction
#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/complete",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Payment ID")),
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Payment completed, booking confirmed", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Payment is not pending"),
        (status = 403, description = "Caller is not the payer"),
    )
)]
pub async fn complete_payment(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Option<Json<CompletePaymentRequest>>,
) -> ApiResult<Json<ApiResponse<PaymentDto>>> {
    let provider_txn = body.and_then(|Json(b)| b.provider_transaction_id);
    let payment = state
        .payments
        .complete(&user.actor(), &id, provider_txn)
        .await?;
    Ok(Json(ApiResponse::success(payment.into())))
}

/// Refund a completed payment in full; the booking is cancelled in the same
/// transaction
#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/refund",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Payment ID")),
    request_body = RefundPaymentRequest,
    responses(
        (status = 200, description = "Payment refunded, booking cancelled", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Payment is not completed"),
        (status = 403, description = "Caller is not the payer"),
    )
)]
pub async fn refund_payment(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Option<Json<RefundPaymentRequest>>,
) -> ApiResult<Json<ApiResponse<PaymentDto>>> {
    let reason = body.and_then(|Json(b)| b.reason);
    let payment = state.payments.refund(&user.actor(), &id, reason).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}
