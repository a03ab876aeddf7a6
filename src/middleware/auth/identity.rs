//! 上流の認証 proxy が付けた user-id header → CallerIdentity を extensions に入れる
//!
//! - header あり: `CallerIdentity::authenticated(<prefix を外した email>)`
//! - header なし: `CallerIdentity::anonymous()` (basic auth mode / identity-aware でない cluster)
//!
//! 認証そのもの (token 検証など) は前段の proxy の責務。ここでは拒否しない。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::config::IdentityConfig;
use crate::services::access::CallerIdentity;
use crate::state::AppState;

/// `/api/*` に identity を載せるための middleware を適用する。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, identity_middleware))
}

async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let caller = resolve_caller(&state.identity, req.headers());

    tracing::debug!(
        has_auth = caller.has_auth(),
        user = caller.email().unwrap_or_default(),
        "caller identity attached"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(caller);

    next.run(req).await
}

pub fn resolve_caller(identity: &IdentityConfig, headers: &HeaderMap) -> CallerIdentity {
    let email = headers
        .get(&identity.userid_header)
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.strip_prefix(identity.userid_prefix.as_str()).unwrap_or(raw))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match email {
        Some(email) => CallerIdentity::authenticated(email),
        None => CallerIdentity::anonymous(),
    }
}
