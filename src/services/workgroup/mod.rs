pub mod client;
pub mod kfam;
#[cfg(test)]
pub mod stub;

pub use client::{WorkgroupError, WorkgroupResolver};
pub use kfam::KfamClient;
