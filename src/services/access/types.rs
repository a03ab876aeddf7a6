/*
 * Responsibility
 * - namespace access 判定で使う型 (契約)
 * - identity / binding / workgroup info / decision
 */
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is calling, as resolved by the identity middleware.
///
/// `email` is present exactly when `has_auth` is true; the constructors are
/// the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    has_auth: bool,
    email: Option<String>,
}

impl CallerIdentity {
    /// Basic-auth / non identity-aware mode.
    pub fn anonymous() -> Self {
        Self {
            has_auth: false,
            email: None,
        }
    }

    pub fn authenticated(email: impl Into<String>) -> Self {
        Self {
            has_auth: true,
            email: Some(email.into()),
        }
    }

    pub fn has_auth(&self) -> bool {
        self.has_auth
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceRole {
    Owner,
    Contributor,
    Viewer,
}

impl NamespaceRole {
    /// Kubernetes cluster role name → dashboard role.
    pub fn from_cluster_role(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Self::Owner),
            "edit" => Some(Self::Contributor),
            "view" => Some(Self::Viewer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceBinding {
    pub namespace: String,
    pub role: NamespaceRole,
    pub user: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkgroupInfo {
    pub is_cluster_admin: bool,
    pub namespaces: Vec<NamespaceBinding>,
}

impl WorkgroupInfo {
    /// Any role on the namespace counts.
    pub fn has_binding_for(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|b| b.namespace == namespace)
    }
}

/// Well-formed request, negative answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("Authentication required to access namespace activities")]
    Unauthenticated,
    #[error(
        "Access denied. You do not have permission to view activities for namespace '{namespace}'."
    )]
    NoBinding { namespace: String },
}

impl Denial {
    pub fn status(&self) -> StatusCode {
        match self {
            Denial::Unauthenticated => StatusCode::UNAUTHORIZED,
            Denial::NoBinding { .. } => StatusCode::FORBIDDEN,
        }
    }
}

/// The check itself could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessFault {
    #[error("Namespace parameter is required")]
    MissingNamespace,
    #[error("Unable to verify namespace access permissions")]
    ResolverUnavailable,
}

impl AccessFault {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessFault::MissingNamespace => StatusCode::BAD_REQUEST,
            AccessFault::ResolverUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(Denial),
    Error(AccessFault),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// `None` when allowed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny(d) => Some(d.status()),
            AccessDecision::Error(f) => Some(f.status()),
        }
    }
}
