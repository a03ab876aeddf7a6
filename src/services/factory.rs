/// Factory: build the upstream collaborators from application `Config`.
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::cluster::{ClusterError, ClusterService, KubeApiClient, KubeApiOptions};
use crate::services::workgroup::{KfamClient, WorkgroupError, WorkgroupResolver};

/// `Ok(None)` when no KFAM endpoint is configured.
pub fn build_workgroup_resolver(
    config: &Config,
) -> Result<Option<Arc<dyn WorkgroupResolver>>, WorkgroupError> {
    let Some(url) = config.kfam_url.as_deref() else {
        return Ok(None);
    };

    let client = KfamClient::new(
        url,
        config.identity.userid_header.clone(),
        config.identity.userid_prefix.clone(),
        Duration::from_secs(config.upstream_timeout_seconds),
    )?;

    Ok(Some(Arc::new(client)))
}

pub fn build_cluster_service(config: &Config) -> Result<Arc<dyn ClusterService>, ClusterError> {
    let kube = KubeApiClient::new(KubeApiOptions {
        base_url: &config.kube.api_url,
        token: config.kube.token.clone(),
        ca_pem: config.kube.ca_pem.as_deref(),
        config_namespace: &config.kube.pod_namespace,
        config_map_name: &config.kube.dashboard_configmap,
        timeout: Duration::from_secs(config.upstream_timeout_seconds),
    })?;

    Ok(Arc::new(kube))
}
