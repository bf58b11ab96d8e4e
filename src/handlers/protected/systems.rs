use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use uuid::Uuid;

use crate::database::models::system::{HydroSystem, HydroSystemDetail};
use crate::filter::pagination::Paged;
use crate::filter::params::SystemListParams;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::system_service::{CreateSystem, SystemService, UpdateSystem};

/// GET /api/systems - list the caller's systems
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<SystemListParams>,
) -> ApiResult<Paged<HydroSystem>> {
    let service = SystemService::new().await?;
    Ok(ApiResponse::success(service.list(auth.user_id, &params).await?))
}

/// POST /api/systems - create a system owned by the caller
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateSystem>,
) -> ApiResult<HydroSystem> {
    let service = SystemService::new().await?;
    Ok(ApiResponse::created(service.create(auth.user_id, input).await?))
}

/// GET /api/systems/:id - detail view with the 10 most recent measurements
pub async fn retrieve(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<HydroSystemDetail> {
    let service = SystemService::new().await?;
    Ok(ApiResponse::success(service.retrieve(auth.user_id, id).await?))
}

/// PUT /api/systems/:id - rename or redescribe a system
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSystem>,
) -> ApiResult<HydroSystem> {
    let service = SystemService::new().await?;
    Ok(ApiResponse::success(service.update(auth.user_id, id, input).await?))
}

/// DELETE /api/systems/:id - delete a system and everything beneath it
pub async fn destroy(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let service = SystemService::new().await?;
    service.delete(auth.user_id, id).await?;
    Ok(ApiResponse::no_content())
}
