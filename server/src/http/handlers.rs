use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use bulb_types::LightBulb;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    dto::HealthResponse,
    error::{ApiError, ApiResult},
    state::AppState,
};

type BulbId = Result<Path<i64>, PathRejection>;
type BulbBody = Result<Json<Option<LightBulb>>, JsonRejection>;

/// GET /bulbs
#[instrument(skip(state))]
pub async fn list_bulbs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<LightBulb>>> {
    let bulbs = state.service.get_all_bulbs().await?;
    Ok(Json(bulbs))
}

/// GET /bulbs/:id
#[instrument(skip(state, id))]
pub async fn get_bulb(
    State(state): State<Arc<AppState>>,
    id: BulbId,
) -> ApiResult<Json<LightBulb>> {
    let Path(id) = id?;
    info!("Getting bulb: {}", id);

    let bulb = state.service.get_bulb_by_id(id).await?;
    Ok(Json(bulb))
}

/// POST /bulbs
/// Create a bulb. Any id in the body is kept and upserted.
#[instrument(skip(state, payload))]
pub async fn create_bulb(
    State(state): State<Arc<AppState>>,
    payload: BulbBody,
) -> ApiResult<(StatusCode, Json<LightBulb>)> {
    let Json(bulb) = payload?;
    let bulb = bulb.ok_or_else(|| ApiError::BadRequest("LightBulb cannot be null".to_string()))?;

    let saved = state.service.add_bulb(bulb).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /bulbs/:id
#[instrument(skip(state, id, payload))]
pub async fn update_bulb(
    State(state): State<Arc<AppState>>,
    id: BulbId,
    payload: BulbBody,
) -> ApiResult<Json<LightBulb>> {
    let Path(id) = id?;
    let Json(update) = payload?;
    let update =
        update.ok_or_else(|| ApiError::BadRequest("Bulb data cannot be null".to_string()))?;
    info!("Updating bulb: {}", id);

    let updated = state.service.update_bulb(id, update).await?;
    Ok(Json(updated))
}

/// DELETE /bulbs/:id
#[instrument(skip(state, id))]
pub async fn delete_bulb(State(state): State<Arc<AppState>>, id: BulbId) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    info!("Deleting bulb: {}", id);

    state.service.delete_bulb(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "bulb-service".to_string(),
        backend: state.service.backend_name().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ping
pub async fn ping() -> &'static str {
    "pong"
}
