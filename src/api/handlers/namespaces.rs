/*
 * Responsibility
 * - GET /api/namespaces
 * - 全 namespace を返す (gate なし。UI の namespace selector 用)
 */
use axum::{Json, extract::State};
use serde_json::Value;

use crate::{error::AppError, state::AppState};

pub async fn list_namespaces(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let namespaces = state.cluster.namespaces().await?;
    Ok(Json(namespaces))
}
