//! Time-series resource utilization metrics.
//!
//! Only the contract lives here; how a backend computes the series is its own
//! business. No backend ships with this service: `AppState::metrics` is never
//! set outside tests, so `/api/metrics` and `/api/metrics/{type}` always answer
//! 405 in a real deployment.
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    Last5m,
    #[default]
    Last15m,
    Last30m,
    Last60m,
    Last180m,
}

impl Interval {
    /// Missing or unknown values fall back to the default window.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Interval {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Last5m" => Ok(Self::Last5m),
            "Last15m" => Ok(Self::Last15m),
            "Last30m" => Ok(Self::Last30m),
            "Last60m" => Ok(Self::Last60m),
            "Last180m" => Ok(Self::Last180m),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Node,
    PodCpu,
    PodMem,
}

impl FromStr for MetricKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "podcpu" => Ok(Self::PodCpu),
            "podmem" => Ok(Self::PodMem),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp: f64,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsLink {
    pub resource_charts_link: Option<String>,
    pub resource_charts_link_text: String,
}

#[derive(Debug, Error)]
#[error("metrics backend error: {0}")]
pub struct MetricsError(pub String);

#[async_trait]
pub trait MetricsService: Send + Sync {
    async fn node_cpu_utilization(
        &self,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError>;

    async fn pod_cpu_utilization(
        &self,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError>;

    async fn pod_memory_usage(
        &self,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError>;

    fn charts_link(&self) -> ChartsLink;

    async fn series(
        &self,
        kind: MetricKind,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError> {
        match kind {
            MetricKind::Node => self.node_cpu_utilization(interval).await,
            MetricKind::PodCpu => self.pod_cpu_utilization(interval).await,
            MetricKind::PodMem => self.pod_memory_usage(interval).await,
        }
    }
}
