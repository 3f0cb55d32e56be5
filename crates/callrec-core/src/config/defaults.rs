// Single source of truth for all default values.

// --- Builder ---
pub const DEFAULT_MIN_CONTEXT_SUPPORT: u32 = 20;

// --- Store ---
pub const DEFAULT_MAX_TOTAL_MODELS: usize = 100;
pub const DEFAULT_MAX_IDLE_PER_TYPE: usize = 8;
pub const DEFAULT_TEMPLATE_CACHE_CAPACITY: u64 = 512;

// --- Query ---
pub const DEFAULT_MIN_PROBABILITY: f64 = 0.1;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;
pub const DEFAULT_MIN_PATTERN_PROBABILITY: f64 = 0.01;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
