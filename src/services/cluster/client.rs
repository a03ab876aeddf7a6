//! Cluster data interface used by the route layer.
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type ClusterResult<T> = Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster api unavailable: {0}")]
    Unavailable(String),
    #[error("cluster api returned status {status} for {path}")]
    UnexpectedStatus { status: u16, path: String },
    #[error("cluster api response invalid: {0}")]
    InvalidResponse(String),
}

/// Read-only view of the cluster the dashboard needs.
///
/// Namespaces and events are passed through untouched; the dashboard
/// front-end knows their shape, this service does not.
#[async_trait]
pub trait ClusterService: Send + Sync {
    async fn namespaces(&self) -> ClusterResult<Vec<Value>>;

    async fn events_for_namespace(&self, namespace: &str) -> ClusterResult<Vec<Value>>;

    // `data` of the dashboard config map (links, settings, ...)
    async fn dashboard_config(&self) -> ClusterResult<BTreeMap<String, String>>;
}
