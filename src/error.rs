/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / `{"error": "<message>"}` body)
 * - access decision / upstream service error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::access::{AccessFault, Denial};
use crate::services::cluster::ClusterError;
use crate::services::metrics::MetricsError;

pub const OPERATION_NOT_SUPPORTED: &str = "Operation not supported";
pub const INVALID_LINKS_CONFIG: &str = "Cannot load dashboard menu link";
pub const INVALID_SETTINGS: &str = "Cannot load dashboard settings";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The message of every variant is what the client sees; upstream details
/// are logged where the error is produced and never carried here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn operation_not_supported() -> Self {
        Self::MethodNotAllowed(OPERATION_NOT_SUPPORTED.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<Denial> for AppError {
    fn from(d: Denial) -> Self {
        match &d {
            Denial::Unauthenticated => AppError::Unauthorized(d.to_string()),
            Denial::NoBinding { .. } => AppError::Forbidden(d.to_string()),
        }
    }
}

impl From<AccessFault> for AppError {
    fn from(f: AccessFault) -> Self {
        match &f {
            AccessFault::MissingNamespace => AppError::BadRequest(f.to_string()),
            AccessFault::ResolverUnavailable => AppError::Internal(f.to_string()),
        }
    }
}

impl From<ClusterError> for AppError {
    fn from(e: ClusterError) -> Self {
        tracing::error!(error = %e, "cluster api request failed");
        AppError::Internal("Unable to load cluster data".to_string())
    }
}

impl From<MetricsError> for AppError {
    fn from(e: MetricsError) -> Self {
        tracing::error!(error = %e, "metrics query failed");
        AppError::Internal("Unable to load metrics".to_string())
    }
}
