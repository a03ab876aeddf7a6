pub mod decision;
pub mod types;


pub use decision::check_access;
pub use types::{
    AccessDecision, AccessFault, CallerIdentity, Denial, NamespaceBinding, NamespaceRole,
    WorkgroupInfo,
};
