//! Alert count aggregation, storage and exposition

pub mod aggregate;
pub mod exposition;
pub mod store;

pub use aggregate::aggregate;
pub use exposition::render;
pub use store::{MetricStore, Snapshot};
