//! # callrec-network
//!
//! Per-type usage networks: a four-layer discrete Bayesian network
//! (context → availability → pattern → method calls) built from mined usage
//! records, an exact inference backend, and the evidence/query protocol that
//! turns partial observations into ranked call recommendations.
//!
//! ```text
//!   context ──► availability
//!      │             │
//!      └────► patterns ◄┘
//!                │
//!        ┌───────┼───────┐
//!        ▼       ▼       ▼
//!      m₁      m₂  ...  mₙ
//! ```

pub mod builder;
pub mod inference;
pub mod network;
pub mod nodes;
pub mod query;
pub mod recommendation;

pub use builder::NetworkBuilder;
pub use inference::BeliefNetwork;
pub use network::{QueryState, UsageNetwork};
pub use query::{CallQuery, QueryResult};
pub use recommendation::{EvidenceSummary, PatternProbability, Recommendation};
