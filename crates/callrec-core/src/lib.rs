//! # callrec-core
//!
//! Foundation crate for the callrec method-call recommender.
//! Defines names, usage records, probability helpers, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod names;
pub mod probability;
pub mod traits;
pub mod usage;

// Re-export the most commonly used types at the crate root.
pub use config::CallRecConfig;
pub use errors::{CallRecError, CallRecResult};
pub use names::{MethodName, TypeName};
pub use usage::UsageRecord;
