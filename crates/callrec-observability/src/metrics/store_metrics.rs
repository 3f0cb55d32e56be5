//! Template builds, pool reuse, exhaustion and eviction counts.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Lock-free counters shared by every thread using a model store.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    templates_built: AtomicU64,
    instances_created: AtomicU64,
    reuses: AtomicU64,
    releases: AtomicU64,
    exhaustions: AtomicU64,
    evictions: AtomicU64,
    load_failures: AtomicU64,
    rejected_types: AtomicU64,
}

/// Point-in-time copy of `StoreMetrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetricsSnapshot {
    pub templates_built: u64,
    pub instances_created: u64,
    pub reuses: u64,
    pub releases: u64,
    pub exhaustions: u64,
    pub evictions: u64,
    pub load_failures: u64,
    pub rejected_types: u64,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_template_built(&self) {
        self.templates_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_instance_created(&self) {
        self.instances_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reuse(&self) {
        self.reuses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exhaustion(&self) {
        self.exhaustions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_type(&self) {
        self.rejected_types.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StoreMetricsSnapshot {
        StoreMetricsSnapshot {
            templates_built: self.templates_built.load(Ordering::Relaxed),
            instances_created: self.instances_created.load(Ordering::Relaxed),
            reuses: self.reuses.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            exhaustions: self.exhaustions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            rejected_types: self.rejected_types.load(Ordering::Relaxed),
        }
    }
}

impl StoreMetricsSnapshot {
    /// Share of acquisitions served from the idle pool (0.0–1.0).
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reuses + self.instances_created;
        if total == 0 {
            0.0
        } else {
            self.reuses as f64 / total as f64
        }
    }
}
