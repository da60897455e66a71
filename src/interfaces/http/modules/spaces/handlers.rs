//! Parking space handlers: public search/detail plus owner management

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::SpaceService;
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::{CreateSpaceRequest, SearchSpacesParams, SpaceDto, UpdateSpaceRequest};

/// Shared state for parking space handlers
#[derive(Clone)]
pub struct SpaceHandlerState {
    pub spaces: Arc<SpaceService>,
}

/// Search active listings
#[utoipa::path(
    get,
    path = "/api/v1/spaces",
    tag = "Parking Spaces",
    params(SearchSpacesParams),
    responses(
        (status = 200, description = "Matching listings, best-rated first", body = ApiResponse<PaginatedResponse<SpaceDto>>),
        (status = 400, description = "Invalid filter combination"),
    )
)]
pub async fn search_spaces(
    State(state): State<SpaceHandlerState>,
    Query(params): Query<SearchSpacesParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<SpaceDto>>>> {
    let query = params.into_query()?;
    let (page, limit) = (query.page, query.limit);
    let (spaces, total) = state.spaces.search(&query).await?;
    let items: Vec<SpaceDto> = spaces.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Public detail view of a listing
#[utoipa::path(
    get,
    path = "/api/v1/spaces/{id}",
    tag = "Parking Spaces",
    params(("id" = String, Path, description = "Parking space ID")),
    responses(
        (status = 200, description = "Listing details", body = ApiResponse<SpaceDto>),
        (status = 404, description = "Unknown or deactivated listing"),
    )
)]
pub async fn get_space(
    State(state): State<SpaceHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SpaceDto>>> {
    let space = state.spaces.get_public(&id).await?;
    Ok(Json(ApiResponse::success(space.into())))
}

/// Create a listing (provider or admin)
#[utoipa::path(
    post,
    path = "/api/v1/spaces",
    tag = "Parking Spaces",
    security(("bearer_auth" = [])),
    request_body = CreateSpaceRequest,
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<SpaceDto>),
        (status = 403, description = "Caller is not a provider"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create_space(
    State(state): State<SpaceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<CreateSpaceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SpaceDto>>)> {
    let input = body.into_domain()?;
    let space = state.spaces.create(&user.actor(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(space.into())),
    ))
}

/// Update a listing (owner or admin)
#[utoipa::path(
    put,
    path = "/api/v1/spaces/{id}",
    tag = "Parking Spaces",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking space ID")),
    request_body = UpdateSpaceRequest,
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<SpaceDto>),
        (status = 403, description = "Caller does not own this listing"),
        (status = 404, description = "Unknown listing"),
    )
)]
pub async fn update_space(
    State(state): State<SpaceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateSpaceRequest>,
) -> ApiResult<Json<ApiResponse<SpaceDto>>> {
    let update = body.into_domain()?;
    let space = state.spaces.update(&user.actor(), &id, update).await?;
    Ok(Json(ApiResponse::success(space.into())))
}

/// Deactivate a listing (owner or admin). The listing disappears from search
/// but its booking history stays.
#[utoipa::path(
    delete,
    path = "/api/v1/spaces/{id}",
    tag = "Parking Spaces",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Parking space ID")),
    responses(
        (status = 200, description = "Listing deactivated", body = ApiResponse<EmptyData>),
        (status = 403, description = "Caller does not own this listing"),
        (status = 404, description = "Unknown listing"),
    )
)]
pub async fn delete_space(
    State(state): State<SpaceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.spaces.deactivate(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// The caller's own listings, active or not
#[utoipa::path(
    get,
    path = "/api/v1/spaces/my/list",
    tag = "Parking Spaces",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own listings", body = ApiResponse<Vec<SpaceDto>>),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn my_spaces(
    State(state): State<SpaceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<Vec<SpaceDto>>>> {
    let spaces = state.spaces.my_spaces(&user.actor()).await?;
    Ok(Json(ApiResponse::success(
        spaces.into_iter().map(Into::into).collect(),
    )))
}
