//! # callrec-store
//!
//! Hands out per-type usage networks to concurrent callers.
//!
//! - `registry`: which types have mined data, computed once.
//! - `ModelStore`: template cache (built at most once per type) plus a
//!   bounded pool of evidence-isolated instances.
//! - `sources`: `IUsageRecordSource` implementations.
//! - `CallRecommender`: one-call query front-end over the store.

pub mod pool;
pub mod recommender;
pub mod registry;
pub mod sources;
pub mod store;

pub use recommender::{CallRecommender, QueryOutcome};
pub use sources::{InMemoryRecordSource, JsonDirectorySource};
pub use store::ModelStore;
