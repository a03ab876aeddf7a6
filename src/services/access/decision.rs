//! Namespace access decision.
//!
//! A caller may read namespace-scoped resources when:
//! - no workgroup resolver is configured (single-tenant deployments)
//! - the deployment is not identity-aware for this caller (basic auth mode)
//! - the caller is a cluster admin
//! - the caller holds any role binding in the namespace
//!
//! The function never writes a response; the namespace middleware turns the
//! decision into one.

use crate::services::workgroup::WorkgroupResolver;

use super::types::{AccessDecision, AccessFault, CallerIdentity, Denial};

/// `resolver == None` means no workgroup resolver is configured.
pub async fn check_access(
    namespace: Option<&str>,
    caller: Option<&CallerIdentity>,
    resolver: Option<&dyn WorkgroupResolver>,
) -> AccessDecision {
    let namespace = match namespace {
        Some(ns) if !ns.is_empty() => ns,
        _ => return AccessDecision::Error(AccessFault::MissingNamespace),
    };

    let Some(resolver) = resolver else {
        return AccessDecision::Allow;
    };

    let Some(caller) = caller else {
        return AccessDecision::Deny(Denial::Unauthenticated);
    };

    if !caller.has_auth() {
        return AccessDecision::Allow;
    }

    let info = match resolver.workgroup_info(caller).await {
        Ok(info) => info,
        Err(err) => {
            tracing::error!(
                namespace = %namespace,
                error = %err,
                "error checking namespace access"
            );
            return AccessDecision::Error(AccessFault::ResolverUnavailable);
        }
    };

    if info.is_cluster_admin || info.has_binding_for(namespace) {
        return AccessDecision::Allow;
    }

    tracing::debug!(
        namespace = %namespace,
        user = caller.email().unwrap_or_default(),
        "namespace access denied"
    );

    AccessDecision::Deny(Denial::NoBinding {
        namespace: namespace.to_string(),
    })
}
