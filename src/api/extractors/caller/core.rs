use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::access::CallerIdentity;

/// CallerIdentity を受け取るための extractor
/// identity middleware が request.extensions() に insert 済みであれば Some
/// middleware 未設定のルートでは None (拒否はしない。判断は access decision 側)
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<CallerIdentity>);

impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCaller(parts.extensions.get::<CallerIdentity>().cloned()))
    }
}
