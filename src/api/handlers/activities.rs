/*
 * Responsibility
 * - GET /api/activities/{namespace}
 * - namespace gate (middleware::auth::namespace) を通過した前提で events を返す
 */
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::{error::AppError, state::AppState};

pub async fn list_activities(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let events = state.cluster.events_for_namespace(&namespace).await?;
    Ok(Json(events))
}
