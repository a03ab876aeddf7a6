/*
 * Responsibility
 * - GET /api/metrics (charts link), GET /api/metrics/{type} (time series)
 * - metrics service 未設定なら 405
 * - interval は query (?interval=Last60m)、不正値は Last15m
 */
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    services::metrics::{ChartsLink, Interval, MetricKind, TimeSeriesPoint},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub interval: Option<String>,
}

pub async fn charts_link(State(state): State<AppState>) -> Result<Json<ChartsLink>, AppError> {
    let metrics = state
        .metrics
        .as_ref()
        .ok_or_else(AppError::operation_not_supported)?;

    Ok(Json(metrics.charts_link()))
}

pub async fn series(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<Vec<TimeSeriesPoint>>, AppError> {
    let kind: MetricKind = kind
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown metric type '{kind}'")))?;

    let metrics = state
        .metrics
        .as_ref()
        .ok_or_else(AppError::operation_not_supported)?;

    let interval = Interval::from_query(query.interval.as_deref());
    let points = metrics.series(kind, interval).await?;

    Ok(Json(points))
}
