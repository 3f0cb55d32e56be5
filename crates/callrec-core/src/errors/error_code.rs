//! Stable string codes for errors crossing the library boundary.

pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const NO_MODEL: &str = "NO_MODEL";
pub const POOL_EXHAUSTED: &str = "POOL_EXHAUSTED";
pub const LOAD_FAILED: &str = "LOAD_FAILED";
pub const REGISTRY_UNAVAILABLE: &str = "REGISTRY_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_NAME: &str = "INVALID_NAME";
pub const CONCURRENCY_ERROR: &str = "CONCURRENCY_ERROR";

/// Maps an error to its stable code.
pub trait CallRecErrorCode {
    fn error_code(&self) -> &'static str;
}
