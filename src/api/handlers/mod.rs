pub mod activities;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod namespaces;
