//! Authentication handlers: register, login, profile, password change

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::IdentityService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest,
    UserDto,
};

/// Shared state for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService>,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserDto>),
        (status = 400, description = "Duplicate email or invalid input"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .identity
        .register(
            &body.name,
            &body.email,
            &body.password,
            &body.phone,
            body.role.as_deref().unwrap_or("user"),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// Authenticate and receive a JWT
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account"),
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let auth = state.identity.login(&body.email, &body.password).await?;
    Ok(Json(ApiResponse::success(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserDto::from(auth.user),
    })))
}

/// Current account details
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let account = state.identity.get_user(&user.user_id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(account))))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn update_profile(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let actor = user.actor();
    let updated = state
        .identity
        .update_profile(
            &actor,
            &actor.id,
            crate::application::services::ProfileUpdate {
                name: body.name,
                phone: body.phone,
                address: body.address,
                avatar: body.avatar,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 401, description = "Current password is wrong"),
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state
        .identity
        .change_password(&user.actor(), &body.current_password, &body.new_password)
        .await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
