use serde::{Deserialize, Serialize};

use super::defaults;

/// Model store and pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on live network instances (lent + idle) across all types.
    pub max_total_models: usize,
    /// Idle instances kept per type after release.
    pub max_idle_per_type: usize,
    /// Built network templates kept in memory.
    pub template_cache_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_total_models: defaults::DEFAULT_MAX_TOTAL_MODELS,
            max_idle_per_type: defaults::DEFAULT_MAX_IDLE_PER_TYPE,
            template_cache_capacity: defaults::DEFAULT_TEMPLATE_CACHE_CAPACITY,
        }
    }
}
