use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use uuid::Uuid;

use crate::database::models::measurement::Measurement;
use crate::filter::pagination::Paged;
use crate::filter::params::MeasurementListParams;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::measurement_service::{
    CreateMeasurement, MeasurementService, UpdateMeasurement,
};

/// GET /api/measurements - list measurements across the caller's systems
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<MeasurementListParams>,
) -> ApiResult<Paged<Measurement>> {
    let service = MeasurementService::new().await?;
    Ok(ApiResponse::success(service.list(auth.user_id, &params).await?))
}

/// POST /api/measurements - record a value against one of the caller's sensors
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateMeasurement>,
) -> ApiResult<Measurement> {
    let service = MeasurementService::new().await?;
    Ok(ApiResponse::created(service.create(auth.user_id, input).await?))
}

/// GET /api/measurements/:id
pub async fn retrieve(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Measurement> {
    let service = MeasurementService::new().await?;
    Ok(ApiResponse::success(service.retrieve(auth.user_id, id).await?))
}

/// PUT /api/measurements/:id - value is re-validated against the sensor kind
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMeasurement>,
) -> ApiResult<Measurement> {
    let service = MeasurementService::new().await?;
    Ok(ApiResponse::success(service.update(auth.user_id, id, input).await?))
}

/// DELETE /api/measurements/:id
pub async fn destroy(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let service = MeasurementService::new().await?;
    service.delete(auth.user_id, id).await?;
    Ok(ApiResponse::no_content())
}
