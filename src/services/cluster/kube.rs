use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Certificate, Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

use crate::services::cluster::client::{ClusterError, ClusterResult, ClusterService};

#[derive(Debug, Deserialize)]
struct ItemList {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ConfigMap {
    #[serde(default)]
    data: BTreeMap<String, String>,
}

/// Kubernetes API server client (core/v1 reads only).
///
/// - Service account token is sent as a bearer token when present.
/// - Token is intentionally not printable via Debug.
#[derive(Clone)]
pub struct KubeApiClient {
    base_url: String,
    token: Option<String>,
    config_namespace: String,
    config_map_name: String,
    client: Client,
}

impl std::fmt::Debug for KubeApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApiClient")
            .field("base_url", &self.base_url)
            .field("config_namespace", &self.config_namespace)
            .field("config_map_name", &self.config_map_name)
            .finish()
    }
}

pub struct KubeApiOptions<'a> {
    pub base_url: &'a str,
    pub token: Option<String>,
    pub ca_pem: Option<&'a str>,
    pub config_namespace: &'a str,
    pub config_map_name: &'a str,
    pub timeout: Duration,
}

impl KubeApiClient {
    pub fn new(opts: KubeApiOptions<'_>) -> ClusterResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(opts.timeout)
            .timeout(opts.timeout);

        if let Some(pem) = opts.ca_pem {
            let ca = Certificate::from_pem(pem.as_bytes())
                .map_err(|e| ClusterError::Unavailable(format!("invalid cluster ca: {e}")))?;
            builder = builder.add_root_certificate(ca);
        }

        let client = builder
            .build()
            .map_err(|e| ClusterError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: opts.base_url.trim_end_matches('/').to_string(),
            token: opts.token,
            config_namespace: opts.config_namespace.to_string(),
            config_map_name: opts.config_map_name.to_string(),
            client,
        })
    }

    /// Each segment is percent-encoded on its own, so a value containing
    /// `/` or `?` stays inside its segment.
    fn url(&self, segments: &[&str]) -> ClusterResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClusterError::Unavailable(format!("invalid cluster api url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClusterError::Unavailable("invalid cluster api url".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ClusterResult<T> {
        let url = self.url(segments)?;
        let path = url.path().to_string();

        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let res = req
            .send()
            .await
            .map_err(|e| ClusterError::Unavailable(e.to_string()))?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(ClusterError::UnexpectedStatus {
                status: status.as_u16(),
                path,
            });
        }

        res.json::<T>()
            .await
            .map_err(|e| ClusterError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ClusterService for KubeApiClient {
    async fn namespaces(&self) -> ClusterResult<Vec<Value>> {
        let list: ItemList = self.get_json(&["api", "v1", "namespaces"]).await?;
        Ok(list.items)
    }

    async fn events_for_namespace(&self, namespace: &str) -> ClusterResult<Vec<Value>> {
        let list: ItemList = self
            .get_json(&["api", "v1", "namespaces", namespace, "events"])
            .await?;
        Ok(list.items)
    }

    async fn dashboard_config(&self) -> ClusterResult<BTreeMap<String, String>> {
        let cm: ConfigMap = self
            .get_json(&[
                "api",
                "v1",
                "namespaces",
                self.config_namespace.as_str(),
                "configmaps",
                self.config_map_name.as_str(),
            ])
            .await?;
        Ok(cm.data)
    }
}
