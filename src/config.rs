/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, identity header, KFAM / Kubernetes API 接続先など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How the identity middleware recognizes an authenticated caller.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub userid_header: HeaderName,
    pub userid_prefix: String,
}

#[derive(Clone)]
pub struct KubeConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub ca_pem: Option<String>,
    pub pod_namespace: String,
    pub dashboard_configmap: String,
}

impl fmt::Debug for KubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the service account token
        f.debug_struct("KubeConfig")
            .field("api_url", &self.api_url)
            .field("has_token", &self.token.is_some())
            .field("has_ca", &self.ca_pem.is_some())
            .field("pod_namespace", &self.pod_namespace)
            .field("dashboard_configmap", &self.dashboard_configmap)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub identity: IdentityConfig,

    // None: no workgroup resolver, namespace scoping is not enforced
    pub kfam_url: Option<String>,
    pub upstream_timeout_seconds: u64,

    pub kube: KubeConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process env in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let userid_header = get("USERID_HEADER")
            .unwrap_or_else(|| "kubeflow-userid".to_string())
            .to_ascii_lowercase();
        let userid_header = HeaderName::from_str(&userid_header)
            .map_err(|_| ConfigError::Invalid("USERID_HEADER"))?;

        let userid_prefix =
            get("USERID_PREFIX").unwrap_or_else(|| "accounts.google.com:".to_string());

        // KFAM_URL wins; otherwise fall back to the in-cluster service env vars.
        let kfam_url = match get("KFAM_URL").filter(|s| !s.trim().is_empty()) {
            Some(url) => Some(url),
            None => get("PROFILES_KFAM_SERVICE_HOST")
                .filter(|s| !s.trim().is_empty())
                .map(|host| {
                    let port = get("PROFILES_KFAM_SERVICE_PORT").unwrap_or_else(|| "8081".into());
                    format!("http://{}:{}", host, port)
                }),
        };
        if let Some(url) = &kfam_url {
            url::Url::parse(url).map_err(|_| ConfigError::Invalid("KFAM_URL"))?;
        }

        let upstream_timeout_seconds = get("UPSTREAM_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);

        let kube = KubeConfig {
            api_url: get("KUBE_API_URL")
                .unwrap_or_else(|| "https://kubernetes.default.svc".to_string()),
            token: read_optional_file(
                get("KUBE_TOKEN_PATH").as_deref(),
                "/var/run/secrets/kubernetes.io/serviceaccount/token",
            )
            .map(|t| t.trim().to_string()),
            ca_pem: read_optional_file(
                get("KUBE_CA_PATH").as_deref(),
                "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt",
            ),
            pod_namespace: get("POD_NAMESPACE").unwrap_or_else(|| "kubeflow".to_string()),
            dashboard_configmap: get("DASHBOARD_CONFIGMAP")
                .unwrap_or_else(|| "centraldashboard-config".to_string()),
        };

        if kube.pod_namespace.trim().is_empty() {
            return Err(ConfigError::Missing("POD_NAMESPACE"));
        }

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            identity: IdentityConfig {
                userid_header,
                userid_prefix,
            },
            kfam_url,
            upstream_timeout_seconds,
            kube,
        })
    }
}

// Service account files only exist in-cluster; their absence is not an error.
fn read_optional_file(path: Option<&str>, default_path: &str) -> Option<String> {
    std::fs::read_to_string(path.unwrap_or(default_path)).ok()
}
