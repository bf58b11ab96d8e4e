use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use uuid::Uuid;

use crate::database::models::sensor::SensorBody;
use crate::filter::pagination::Paged;
use crate::filter::params::SensorListParams;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::sensor_service::{CreateSensor, SensorService, UpdateSensor};

/// GET /api/sensors - list sensors across the caller's systems
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<SensorListParams>,
) -> ApiResult<Paged<SensorBody>> {
    let service = SensorService::new().await?;
    Ok(ApiResponse::success(service.list(auth.user_id, &params).await?))
}

/// POST /api/sensors - attach a sensor to one of the caller's systems
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateSensor>,
) -> ApiResult<SensorBody> {
    let service = SensorService::new().await?;
    Ok(ApiResponse::created(service.create(auth.user_id, input).await?))
}

/// GET /api/sensors/:id
pub async fn retrieve(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<SensorBody> {
    let service = SensorService::new().await?;
    Ok(ApiResponse::success(service.retrieve(auth.user_id, id).await?))
}

/// PUT /api/sensors/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSensor>,
) -> ApiResult<SensorBody> {
    let service = SensorService::new().await?;
    Ok(ApiResponse::success(service.update(auth.user_id, id, input).await?))
}

/// DELETE /api/sensors/:id - delete a sensor and its measurements
pub async fn destroy(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let service = SensorService::new().await?;
    service.delete(auth.user_id, id).await?;
    Ok(ApiResponse::no_content())
}
