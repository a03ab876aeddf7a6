/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: cluster: ClusterService, metrics: MetricsService, workgroup: WorkgroupResolver など
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::IdentityConfig;
use crate::services::{
    cluster::ClusterService, metrics::MetricsService, workgroup::WorkgroupResolver,
};

#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityConfig,
    pub cluster: Arc<dyn ClusterService>,
    // None: /api/metrics* answer 405
    pub metrics: Option<Arc<dyn MetricsService>>,
    // None: namespace scoping is not enforced
    pub workgroup: Option<Arc<dyn WorkgroupResolver>>,
}

impl AppState {
    pub fn new(identity: IdentityConfig, cluster: Arc<dyn ClusterService>) -> Self {
        Self {
            identity,
            cluster,
            metrics: None,
            workgroup: None,
        }
    }

    // only tests plug a backend in; see services::metrics
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsService>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_workgroup(mut self, workgroup: Option<Arc<dyn WorkgroupResolver>>) -> Self {
        self.workgroup = workgroup;
        self
    }
}
