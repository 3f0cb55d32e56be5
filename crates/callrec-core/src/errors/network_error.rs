use super::error_code::{self, CallRecErrorCode};

/// Errors raised while building or querying a discrete network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("unknown node: {node}")]
    UnknownNode { node: String },

    #[error("duplicate node: {node}")]
    DuplicateNode { node: String },

    #[error("node {node} has no outcome {outcome}")]
    UnknownOutcome { node: String, outcome: String },

    #[error("node {node} needs at least one outcome")]
    NoOutcomes { node: String },

    #[error("arc {parent} -> {child} would create a cycle")]
    CycleDetected { parent: String, child: String },

    #[error("invalid CPT for {node}: {reason}")]
    InvalidCpt { node: String, reason: String },

    #[error("evidence on {node} has zero probability")]
    ImpossibleEvidence { node: String },
}

impl CallRecErrorCode for NetworkError {
    fn error_code(&self) -> &'static str {
        error_code::NETWORK_ERROR
    }
}
