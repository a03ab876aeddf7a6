//! Profile access management (KFAM) backed workgroup resolver.
//!
//! Endpoints used:
//! - `GET /kfam/v1/bindings?user=<email>` (role bindings held by the user)
//! - `GET /kfam/v1/role/clusteradmin?user=<email>` (JSON boolean)
//!
//! The caller's identity header is forwarded so KFAM sees the same user the
//! dashboard does.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;

use crate::services::access::{CallerIdentity, NamespaceBinding, NamespaceRole, WorkgroupInfo};
use crate::services::workgroup::client::{WorkgroupError, WorkgroupResolver};

#[derive(Debug, Deserialize)]
struct BindingList {
    #[serde(default)]
    bindings: Option<Vec<KfamBinding>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KfamBinding {
    user: KfamSubject,
    referred_namespace: String,
    role_ref: KfamRoleRef,
}

#[derive(Debug, Deserialize)]
struct KfamSubject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct KfamRoleRef {
    name: String,
}

#[derive(Clone, Debug)]
pub struct KfamClient {
    // no trailing slash
    base_url: String,
    userid_header: HeaderName,
    userid_prefix: String,
    client: Client,
}

impl KfamClient {
    pub fn new(
        base_url: &str,
        userid_header: HeaderName,
        userid_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WorkgroupError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| WorkgroupError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            userid_header,
            userid_prefix: userid_prefix.into(),
            client,
        })
    }

    fn url(&self, path: &str, user: &str) -> Result<Url, WorkgroupError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| WorkgroupError::Unavailable(format!("invalid kfam url: {e}")))?;
        url.query_pairs_mut().append_pair("user", user);
        Ok(url)
    }

    fn identity_headers(&self, email: &str) -> Result<HeaderMap, WorkgroupError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("{}{}", self.userid_prefix, email))
            .map_err(|_| WorkgroupError::MissingIdentity)?;
        headers.insert(self.userid_header.clone(), value);
        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        headers: HeaderMap,
    ) -> Result<T, WorkgroupError> {
        let res = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| WorkgroupError::Unavailable(e.to_string()))?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(WorkgroupError::UnexpectedStatus(status.as_u16()));
        }

        res.json::<T>()
            .await
            .map_err(|e| WorkgroupError::InvalidResponse(e.to_string()))
    }

    pub async fn bindings(&self, email: &str) -> Result<Vec<NamespaceBinding>, WorkgroupError> {
        let url = self.url("/kfam/v1/bindings", email)?;
        let list: BindingList = self.get_json(url, self.identity_headers(email)?).await?;

        let bindings = list
            .bindings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|b| match NamespaceRole::from_cluster_role(&b.role_ref.name) {
                Some(role) => Some(NamespaceBinding {
                    namespace: b.referred_namespace,
                    role,
                    user: b.user.name,
                }),
                None => {
                    tracing::warn!(
                        namespace = %b.referred_namespace,
                        role = %b.role_ref.name,
                        "ignoring binding with unknown role"
                    );
                    None
                }
            })
            .collect();

        Ok(bindings)
    }

    pub async fn is_cluster_admin(&self, email: &str) -> Result<bool, WorkgroupError> {
        let url = self.url("/kfam/v1/role/clusteradmin", email)?;
        self.get_json(url, self.identity_headers(email)?).await
    }
}

#[async_trait]
impl WorkgroupResolver for KfamClient {
    async fn workgroup_info(
        &self,
        caller: &CallerIdentity,
    ) -> Result<WorkgroupInfo, WorkgroupError> {
        let email = caller.email().ok_or(WorkgroupError::MissingIdentity)?;

        let (namespaces, is_cluster_admin) =
            tokio::try_join!(self.bindings(email), self.is_cluster_admin(email))?;

        Ok(WorkgroupInfo {
            is_cluster_admin,
            namespaces,
        })
    }
}
