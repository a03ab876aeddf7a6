/*
 * Responsibility
 * - GET /api/dashboard-links, GET /api/dashboard-settings
 * - dashboard config map の `links` / `settings` キー (JSON 文字列) を parse して返す
 */
use axum::{Json, extract::State};
use serde_json::Value;

use crate::{
    error::{AppError, INVALID_LINKS_CONFIG, INVALID_SETTINGS},
    state::AppState,
};

async fn config_entry(
    state: &AppState,
    key: &str,
    invalid_message: &str,
) -> Result<Value, AppError> {
    let data = state.cluster.dashboard_config().await?;

    let raw = data.get(key).ok_or_else(|| {
        tracing::error!(key, "dashboard config map entry missing");
        AppError::Internal(invalid_message.to_string())
    })?;

    serde_json::from_str(raw).map_err(|err| {
        tracing::error!(key, error = %err, "dashboard config map entry is not valid JSON");
        AppError::Internal(invalid_message.to_string())
    })
}

pub async fn links(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(config_entry(&state, "links", INVALID_LINKS_CONFIG).await?))
}

pub async fn settings(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(config_entry(&state, "settings", INVALID_SETTINGS).await?))
}
