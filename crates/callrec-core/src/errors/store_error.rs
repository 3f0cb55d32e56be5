use super::error_code::{self, CallRecErrorCode};

/// Errors raised by the model store.
#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    /// Caller asked for a type without mined data.
    #[error("no model available for type {type_name}")]
    NoModel { type_name: String },

    /// Every pool slot is lent out. Retry later.
    #[error("model pool exhausted: {live} of {max} instances in use")]
    PoolExhausted { live: usize, max: usize },

    #[error("loading usage records for {type_name} failed: {reason}")]
    LoadFailed { type_name: String, reason: String },

    #[error("type registry unavailable: {reason}")]
    RegistryUnavailable { reason: String },
}

impl CallRecErrorCode for ModelStoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoModel { .. } => error_code::NO_MODEL,
            Self::PoolExhausted { .. } => error_code::POOL_EXHAUSTED,
            Self::LoadFailed { .. } => error_code::LOAD_FAILED,
            Self::RegistryUnavailable { .. } => error_code::REGISTRY_UNAVAILABLE,
        }
    }
}
