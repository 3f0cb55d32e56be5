//! Counters collected by the model store.

pub mod store_metrics;

pub use store_metrics::{StoreMetrics, StoreMetricsSnapshot};
