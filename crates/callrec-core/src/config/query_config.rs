use serde::{Deserialize, Serialize};

use super::defaults;

/// Defaults applied to recommendation queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Calls below this posterior are not recommended.
    pub min_probability: f64,
    /// Maximum recommendations per query.
    pub max_recommendations: usize,
    /// Patterns below this posterior are not reported.
    pub min_pattern_probability: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_probability: defaults::DEFAULT_MIN_PROBABILITY,
            max_recommendations: defaults::DEFAULT_MAX_RECOMMENDATIONS,
            min_pattern_probability: defaults::DEFAULT_MIN_PATTERN_PROBABILITY,
        }
    }
}
