pub mod caller;

pub use caller::MaybeCaller;
