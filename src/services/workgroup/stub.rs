//! In-memory resolver for tests.
use std::sync::Mutex;

use async_trait::async_trait;

use crate::services::access::{CallerIdentity, NamespaceBinding, NamespaceRole, WorkgroupInfo};
use crate::services::workgroup::client::{WorkgroupError, WorkgroupResolver};

pub struct StubResolver {
    outcome: Result<WorkgroupInfo, String>,
    calls: Mutex<Vec<CallerIdentity>>,
}

impl StubResolver {
    pub fn returning(info: WorkgroupInfo) -> Self {
        Self {
            outcome: Ok(info),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn member_of(user: &str, bindings: &[(&str, NamespaceRole)]) -> Self {
        Self::returning(WorkgroupInfo {
            is_cluster_admin: false,
            namespaces: bindings
                .iter()
                .map(|(ns, role)| NamespaceBinding {
                    namespace: ns.to_string(),
                    role: *role,
                    user: user.to_string(),
                })
                .collect(),
        })
    }

    pub fn cluster_admin() -> Self {
        Self::returning(WorkgroupInfo {
            is_cluster_admin: true,
            namespaces: Vec::new(),
        })
    }

    pub fn calls(&self) -> Vec<CallerIdentity> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkgroupResolver for StubResolver {
    async fn workgroup_info(
        &self,
        caller: &CallerIdentity,
    ) -> Result<WorkgroupInfo, WorkgroupError> {
        self.calls.lock().unwrap().push(caller.clone());
        match &self.outcome {
            Ok(info) => Ok(info.clone()),
            Err(reason) => Err(WorkgroupError::Unavailable(reason.clone())),
        }
    }
}
