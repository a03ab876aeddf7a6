use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderName, Request, StatusCode},
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::handlers::activities;
use crate::config::IdentityConfig;
use crate::middleware::auth::namespace;
use crate::services::access::NamespaceRole;
use crate::services::cluster::{ClusterService, client::ClusterResult};
use crate::services::metrics::{ChartsLink, Interval, MetricsError, MetricsService, TimeSeriesPoint};
use crate::services::workgroup::{WorkgroupResolver, stub::StubResolver};
use crate::state::AppState;

#[derive(Default)]
struct StubCluster {
    config: BTreeMap<String, String>,
    events_requested: Mutex<Vec<String>>,
}

impl StubCluster {
    fn with_config(pairs: &[(&str, &str)]) -> Self {
        Self {
            config: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn events_requested(&self) -> Vec<String> {
        self.events_requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterService for StubCluster {
    async fn namespaces(&self) -> ClusterResult<Vec<Value>> {
        Ok(vec![
            json!({"metadata": {"name": "team-a"}}),
            json!({"metadata": {"name": "team-b"}}),
        ])
    }

    async fn events_for_namespace(&self, namespace: &str) -> ClusterResult<Vec<Value>> {
        self.events_requested
            .lock()
            .unwrap()
            .push(namespace.to_string());
        Ok(vec![json!({"reason": "Created", "namespace": namespace})])
    }

    async fn dashboard_config(&self) -> ClusterResult<BTreeMap<String, String>> {
        Ok(self.config.clone())
    }
}

#[derive(Default)]
struct StubMetrics {
    calls: Mutex<Vec<(&'static str, Interval)>>,
}

impl StubMetrics {
    fn record(&self, kind: &'static str, interval: Interval) -> Vec<TimeSeriesPoint> {
        self.calls.lock().unwrap().push((kind, interval));
        vec![TimeSeriesPoint {
            timestamp: 1_700_000_000.0,
            label: "node-1".into(),
            value: 0.5,
        }]
    }

    fn calls(&self) -> Vec<(&'static str, Interval)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsService for StubMetrics {
    async fn node_cpu_utilization(
        &self,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError> {
        Ok(self.record("node", interval))
    }

    async fn pod_cpu_utilization(
        &self,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError> {
        Ok(self.record("podcpu", interval))
    }

    async fn pod_memory_usage(
        &self,
        interval: Interval,
    ) -> Result<Vec<TimeSeriesPoint>, MetricsError> {
        Ok(self.record("podmem", interval))
    }

    fn charts_link(&self) -> ChartsLink {
        ChartsLink {
            resource_charts_link: None,
            resource_charts_link_text: "View in dashboard".into(),
        }
    }
}

fn identity() -> IdentityConfig {
    IdentityConfig {
        userid_header: HeaderName::from_static("kubeflow-userid"),
        userid_prefix: "accounts.google.com:".into(),
    }
}

fn state(cluster: Arc<StubCluster>, resolver: Option<Arc<StubResolver>>) -> AppState {
    AppState::new(identity(), cluster)
        .with_workgroup(resolver.map(|r| r as Arc<dyn WorkgroupResolver>))
}

fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", crate::api::routes(state.clone()))
        .with_state(state)
}

fn get_as(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().uri(uri);
    if let Some(user) = user {
        req = req.header("kubeflow-userid", format!("accounts.google.com:{user}"));
    }
    req.body(Body::empty()).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// --- namespace gate ---------------------------------------------------------

#[tokio::test]
async fn missing_namespace_param_is_bad_request() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::cluster_admin());
    let state = state(Arc::clone(&cluster), Some(Arc::clone(&resolver)));

    let gated = namespace::apply(
        Router::new().route("/activities", get(|| async { "unreachable" })),
        state.clone(),
    );
    let (status, body) = send(gated.with_state(state), get_as("/activities", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Namespace parameter is required"}));
    assert!(resolver.calls().is_empty());
}

#[tokio::test]
async fn without_resolver_activities_are_served() {
    let cluster = Arc::new(StubCluster::default());
    let app = app(state(Arc::clone(&cluster), None));

    let (status, body) = send(app, get_as("/api/activities/team-a", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["namespace"], "team-a");
    assert_eq!(cluster.events_requested(), vec!["team-a"]);
}

#[tokio::test]
async fn without_identity_layer_caller_is_unauthenticated() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::cluster_admin());
    let state = state(Arc::clone(&cluster), Some(Arc::clone(&resolver)));

    // gate only; nothing attaches an identity
    let gated = namespace::apply(
        Router::new().route(
            "/activities/{namespace}",
            get(activities::list_activities),
        ),
        state.clone(),
    );
    let (status, body) = send(
        gated.with_state(state),
        get_as("/activities/team-a", Some("a@x.com")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"error": "Authentication required to access namespace activities"})
    );
    assert!(cluster.events_requested().is_empty());
    assert!(resolver.calls().is_empty());
}

#[tokio::test]
async fn basic_auth_mode_is_allowed() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::member_of("a@x.com", &[]));
    let app = app(state(Arc::clone(&cluster), Some(Arc::clone(&resolver))));

    let (status, _) = send(app, get_as("/api/activities/team-a", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(resolver.calls().is_empty());
}

#[tokio::test]
async fn caller_without_binding_is_forbidden() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::member_of(
        "a@x.com",
        &[("team-b", NamespaceRole::Owner)],
    ));
    let app = app(state(Arc::clone(&cluster), Some(Arc::clone(&resolver))));

    let (status, body) = send(app, get_as("/api/activities/team-a", Some("a@x.com"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({"error": "Access denied. You do not have permission to view activities for namespace 'team-a'."})
    );
    assert!(cluster.events_requested().is_empty());
    assert_eq!(resolver.calls()[0].email(), Some("a@x.com"));
}

#[tokio::test]
async fn caller_with_binding_is_allowed() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::member_of(
        "a@x.com",
        &[("team-b", NamespaceRole::Owner)],
    ));
    let app = app(state(Arc::clone(&cluster), Some(resolver)));

    let (status, body) = send(app, get_as("/api/activities/team-b", Some("a@x.com"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["namespace"], "team-b");
    assert_eq!(cluster.events_requested(), vec!["team-b"]);
}

#[tokio::test]
async fn resolver_failure_is_internal_error_without_detail() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::failing("connection reset by kfam-7f9c"));
    let app = app(state(Arc::clone(&cluster), Some(resolver)));

    let (status, body) = send(app, get_as("/api/activities/team-a", Some("a@x.com"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Unable to verify namespace access permissions"})
    );
    assert!(cluster.events_requested().is_empty());
}

#[tokio::test]
async fn ungated_routes_ignore_the_resolver() {
    let cluster = Arc::new(StubCluster::default());
    let resolver = Arc::new(StubResolver::failing("down"));
    let app = app(state(cluster, Some(Arc::clone(&resolver))));

    let (status, body) = send(app, get_as("/api/namespaces", Some("a@x.com"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert!(resolver.calls().is_empty());
}

// --- metrics ------------------------------------------------------------------

#[tokio::test]
async fn metrics_without_service_is_not_supported() {
    let cluster = Arc::new(StubCluster::default());

    for uri in ["/api/metrics", "/api/metrics/podcpu"] {
        let app = app(state(Arc::clone(&cluster), None));
        let (status, body) = send(app, get_as(uri, None)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(body, json!({"error": "Operation not supported"}));
    }
}

#[tokio::test]
async fn metrics_series_use_requested_or_default_interval() {
    let cluster = Arc::new(StubCluster::default());
    let metrics = Arc::new(StubMetrics::default());
    let state = state(cluster, None).with_metrics(Arc::clone(&metrics) as Arc<dyn MetricsService>);

    for uri in [
        "/api/metrics/node",
        "/api/metrics/node?interval=100",
        "/api/metrics/node?interval=Last60m",
        "/api/metrics/podcpu",
        "/api/metrics/podmem",
    ] {
        let (status, body) = send(app(state.clone()), get_as(uri, None)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body[0]["label"], "node-1");
    }

    assert_eq!(
        metrics.calls(),
        vec![
            ("node", Interval::Last15m),
            ("node", Interval::Last15m),
            ("node", Interval::Last60m),
            ("podcpu", Interval::Last15m),
            ("podmem", Interval::Last15m),
        ]
    );
}

#[tokio::test]
async fn metrics_charts_link_and_unknown_type() {
    let metrics = Arc::new(StubMetrics::default());
    let state = state(Arc::new(StubCluster::default()), None)
        .with_metrics(metrics as Arc<dyn MetricsService>);

    let (status, body) = send(app(state.clone()), get_as("/api/metrics", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resourceChartsLinkText"], "View in dashboard");

    let (status, _) = send(app(state), get_as("/api/metrics/disk", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- dashboard config ---------------------------------------------------------

#[tokio::test]
async fn dashboard_links_and_settings_are_parsed() {
    let cluster = Arc::new(StubCluster::with_config(&[
        ("links", r#"{"menuLinks":[{"text":"Notebooks","link":"/jupyter/"}]}"#),
        ("settings", r#"{"DASHBOARD_FORCE_IFRAME":true}"#),
    ]));

    let (status, body) = send(
        app(state(Arc::clone(&cluster), None)),
        get_as("/api/dashboard-links", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menuLinks"][0]["text"], "Notebooks");

    let (status, body) = send(
        app(state(cluster, None)),
        get_as("/api/dashboard-settings", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["DASHBOARD_FORCE_IFRAME"], true);
}

#[tokio::test]
async fn malformed_dashboard_config_is_internal_error() {
    let cluster = Arc::new(StubCluster::with_config(&[("links", "{not json")]));

    let (status, body) = send(
        app(state(Arc::clone(&cluster), None)),
        get_as("/api/dashboard-links", None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Cannot load dashboard menu link"}));

    // settings key is missing entirely
    let (status, body) = send(
        app(state(cluster, None)),
        get_as("/api/dashboard-settings", None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Cannot load dashboard settings"}));
}
