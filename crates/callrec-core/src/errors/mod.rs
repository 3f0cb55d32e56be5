//! Error handling for callrec.
//! One error enum per subsystem, aggregated into `CallRecError`. `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod network_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use error_code::CallRecErrorCode;
pub use network_error::NetworkError;
pub use store_error::ModelStoreError;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum CallRecError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("model store error: {0}")]
    ModelStore(#[from] ModelStoreError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),
}

impl CallRecErrorCode for CallRecError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Network(e) => e.error_code(),
            Self::ModelStore(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::InvalidName { .. } => error_code::INVALID_NAME,
            Self::ConcurrencyError(_) => error_code::CONCURRENCY_ERROR,
        }
    }
}

pub type CallRecResult<T> = Result<T, CallRecError>;
