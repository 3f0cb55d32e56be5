use serde::{Deserialize, Serialize};

use super::defaults;

/// Network construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Contexts seen fewer times than this are merged into the unknown context.
    pub min_context_support: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_context_support: defaults::DEFAULT_MIN_CONTEXT_SUPPORT,
        }
    }
}
