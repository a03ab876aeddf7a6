pub mod client;
pub mod kube;

pub use client::{ClusterError, ClusterService};
pub use kube::{KubeApiClient, KubeApiOptions};
