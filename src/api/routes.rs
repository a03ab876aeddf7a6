/*
 * Responsibility
 * - /api の URL 構造を定義
 * - namespace gate が必要な範囲 (/activities/{namespace}) にだけ route_layer を掛ける
 * - identity は /api 全体に掛ける (gate より外側で実行される)
 */
use axum::{Router, routing::get};

use crate::middleware::auth::{identity, namespace};
use crate::state::AppState;

use crate::api::handlers::{activities, dashboard, metrics, namespaces};

pub fn routes(state: AppState) -> Router<AppState> {
    let gated = Router::new().route(
        "/activities/{namespace}",
        get(activities::list_activities),
    );
    let gated = namespace::apply(gated, state.clone());

    let api = Router::new()
        .route("/metrics", get(metrics::charts_link))
        .route("/metrics/{kind}", get(metrics::series))
        .route("/namespaces", get(namespaces::list_namespaces))
        .route("/dashboard-links", get(dashboard::links))
        .route("/dashboard-settings", get(dashboard::settings))
        .merge(gated);

    identity::apply(api, state)
}
