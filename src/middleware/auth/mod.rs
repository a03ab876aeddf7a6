pub mod identity;
pub mod namespace;
