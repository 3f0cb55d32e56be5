//! # callrec-observability
//!
//! Structured tracing setup, one event function per notable operation,
//! span macros for network builds and queries, and atomic counters for the
//! model store.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{StoreMetrics, StoreMetricsSnapshot};
