//! Workgroup resolver interface used by the namespace access decision.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::access::{CallerIdentity, WorkgroupInfo};

/// Workgroup lookup failures.
///
/// Note:
/// - The access decision does not look at the variant; every failure becomes
///   the same 500. The variants exist for the operator log.
#[derive(Debug, Error)]
pub enum WorkgroupError {
    #[error("caller has no identity to look up")]
    MissingIdentity,
    #[error("workgroup backend unavailable: {0}")]
    Unavailable(String),
    #[error("workgroup backend returned status {0}")]
    UnexpectedStatus(u16),
    #[error("workgroup backend response invalid: {0}")]
    InvalidResponse(String),
}

/// Resolves an authenticated caller to their authorization profile.
///
/// Implementations own their timeout and retry policy; a timeout is reported
/// as an ordinary error.
#[async_trait]
pub trait WorkgroupResolver: Send + Sync {
    async fn workgroup_info(&self, caller: &CallerIdentity)
    -> Result<WorkgroupInfo, WorkgroupError>;
}
