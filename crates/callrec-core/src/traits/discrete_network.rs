use std::fmt;

use crate::errors::{CallRecResult, NetworkError};

/// Handle to a node inside an `IDiscreteNetwork`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A discrete Bayesian network with evidence and belief updating.
///
/// CPT layout: one row per parent configuration, enumerated row-major over
/// the parents in the order their arcs were added (first parent varies
/// slowest). Each row holds the node's outcome probabilities in declared order.
pub trait IDiscreteNetwork: Send + Sync {
    /// Add a categorical node. Names must be unique.
    fn add_node(&mut self, name: &str, outcomes: &[String]) -> CallRecResult<NodeId>;

    /// Add `parent -> child`. Resets the child's CPT to uniform.
    fn add_arc(&mut self, parent: NodeId, child: NodeId) -> CallRecResult<()>;

    /// Replace the node's CPT. Rows must sum to one.
    fn set_cpt(&mut self, node: NodeId, cpt: Vec<f64>) -> CallRecResult<()>;

    fn set_evidence(&mut self, node: NodeId, outcome: usize) -> CallRecResult<()>;

    fn clear_evidence(&mut self, node: NodeId) -> CallRecResult<()>;

    fn clear_all_evidence(&mut self);

    /// Recompute every node's posterior marginal under the current evidence.
    fn update_beliefs(&mut self) -> CallRecResult<()>;

    /// Posterior from the last `update_beliefs`, one cell per outcome.
    fn marginal(&self, node: NodeId) -> CallRecResult<&[f64]>;

    fn node_id(&self, name: &str) -> Option<NodeId>;

    fn node_name(&self, node: NodeId) -> CallRecResult<&str>;

    fn outcomes(&self, node: NodeId) -> CallRecResult<&[String]>;

    fn evidence(&self, node: NodeId) -> Option<usize>;

    fn parents(&self, node: NodeId) -> CallRecResult<&[NodeId]>;

    fn children(&self, node: NodeId) -> CallRecResult<Vec<NodeId>>;

    fn cpt(&self, node: NodeId) -> CallRecResult<&[f64]>;

    fn node_count(&self) -> usize;

    fn outcome_index(&self, node: NodeId, outcome: &str) -> CallRecResult<usize> {
        let outcomes = self.outcomes(node)?;
        outcomes.iter().position(|o| o == outcome).ok_or_else(|| {
            NetworkError::UnknownOutcome {
                node: node.to_string(),
                outcome: outcome.to_string(),
            }
            .into()
        })
    }

    fn set_evidence_by_name(&mut self, node: NodeId, outcome: &str) -> CallRecResult<()> {
        let index = self.outcome_index(node, outcome)?;
        self.set_evidence(node, index)
    }

    fn has_evidence(&self, node: NodeId) -> bool {
        self.evidence(node).is_some()
    }
}
