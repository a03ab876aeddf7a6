pub mod access;
pub mod cluster;
pub mod factory;
pub mod metrics;
pub mod workgroup;
