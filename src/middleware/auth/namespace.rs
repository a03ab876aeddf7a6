//! namespace-scoped ルートの認可 gate
//!
//! `{namespace}` path parameter と CallerIdentity から `check_access` を呼び、
//! Allow なら handler へ、Deny / Error なら `{"error": ...}` で打ち切る。
//!
//! routing 後に path parameter を読むため `route_layer` で掛ける。

use std::collections::HashMap;

use axum::{
    RequestExt, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::MaybeCaller;
use crate::error::AppError;
use crate::services::access::{AccessDecision, check_access};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        state,
        namespace_access_middleware,
    ))
}

async fn namespace_access_middleware(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // route に {namespace} が無い / 取れない場合は None → 400
    let namespace = req
        .extract_parts::<Path<HashMap<String, String>>>()
        .await
        .ok()
        .and_then(|Path(mut params)| params.remove("namespace"));

    let decision = check_access(
        namespace.as_deref(),
        caller.as_ref(),
        state.workgroup.as_deref(),
    )
    .await;

    if !decision.is_allowed() {
        tracing::info!(
            namespace = namespace.as_deref().unwrap_or_default(),
            status = decision.status().map(|s| s.as_u16()),
            "namespace access refused"
        );
    }

    match decision {
        AccessDecision::Allow => Ok(next.run(req).await),
        AccessDecision::Deny(denial) => Err(denial.into()),
        AccessDecision::Error(fault) => Err(fault.into()),
    }
}
