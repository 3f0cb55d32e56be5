//! Typed views over the four node layers of a usage network.
//!
//! Each view holds only the node handle plus decoded outcome labels; all
//! probabilities stay inside the `IDiscreteNetwork`.

use callrec_core::constants::{STATE_FALSE, STATE_TRUE, UNKNOWN_CONTEXT};
use callrec_core::errors::{CallRecError, CallRecResult, NetworkError};
use callrec_core::traits::{IDiscreteNetwork, NodeId};
use callrec_core::MethodName;

/// Outcome index of `true` on binary nodes.
pub const TRUE_INDEX: usize = 0;
/// Outcome index of `false` on binary nodes.
pub const FALSE_INDEX: usize = 1;

/// Calling-context layer. The last outcome is the unknown context.
#[derive(Debug, Clone)]
pub struct ContextNode {
    id: NodeId,
    contexts: Vec<MethodName>,
}

impl ContextNode {
    pub(crate) fn discover<N: IDiscreteNetwork>(net: &N, id: NodeId) -> CallRecResult<Self> {
        let contexts = net
            .outcomes(id)?
            .iter()
            .map(|o| MethodName::new(o.as_str()))
            .collect::<CallRecResult<Vec<_>>>()?;
        Ok(Self { id, contexts })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// All context outcomes in node order, unknown context included.
    pub fn contexts(&self) -> &[MethodName] {
        &self.contexts
    }

    /// Index of a context the network was trained on. The unknown context
    /// itself is not considered known.
    pub fn index_of(&self, context: &MethodName) -> Option<usize> {
        if context.identifier() == UNKNOWN_CONTEXT {
            return None;
        }
        self.contexts.iter().position(|c| c == context)
    }
}

/// Binary "is the object used at all" layer.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityNode {
    id: NodeId,
}

impl AvailabilityNode {
    pub(crate) fn discover<N: IDiscreteNetwork>(net: &N, id: NodeId) -> CallRecResult<Self> {
        check_binary(net, id)?;
        Ok(Self { id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn set_available<N: IDiscreteNetwork>(
        &self,
        net: &mut N,
        available: bool,
    ) -> CallRecResult<()> {
        net.set_evidence(self.id, if available { TRUE_INDEX } else { FALSE_INDEX })
    }
}

/// Pattern layer. Outcome 0 is the synthetic "none" pattern.
#[derive(Debug, Clone)]
pub struct PatternNode {
    id: NodeId,
    names: Vec<String>,
}

impl PatternNode {
    pub(crate) fn discover<N: IDiscreteNetwork>(net: &N, id: NodeId) -> CallRecResult<Self> {
        Ok(Self {
            id,
            names: net.outcomes(id)?.to_vec(),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Pattern names in node order, `none` first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// One binary "was this method called" node.
#[derive(Debug, Clone)]
pub struct MethodNode {
    id: NodeId,
    method: MethodName,
}

impl MethodNode {
    pub(crate) fn discover<N: IDiscreteNetwork>(net: &N, id: NodeId) -> CallRecResult<Self> {
        check_binary(net, id)?;
        Ok(Self {
            id,
            method: MethodName::new(net.node_name(id)?)?,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn method(&self) -> &MethodName {
        &self.method
    }

    pub(crate) fn set_called<N: IDiscreteNetwork>(
        &self,
        net: &mut N,
        called: bool,
    ) -> CallRecResult<()> {
        net.set_evidence(self.id, if called { TRUE_INDEX } else { FALSE_INDEX })
    }

    pub fn is_observed<N: IDiscreteNetwork>(&self, net: &N) -> bool {
        net.has_evidence(self.id)
    }

    /// Posterior probability that the method is called.
    pub fn probability<N: IDiscreteNetwork>(&self, net: &N) -> CallRecResult<f64> {
        net.marginal(self.id)?
            .get(TRUE_INDEX)
            .copied()
            .ok_or_else(|| malformed(self.id, "missing true outcome"))
    }
}

fn check_binary<N: IDiscreteNetwork>(net: &N, id: NodeId) -> CallRecResult<()> {
    let outcomes = net.outcomes(id)?;
    if outcomes.len() == 2
        && outcomes[TRUE_INDEX] == STATE_TRUE
        && outcomes[FALSE_INDEX] == STATE_FALSE
    {
        Ok(())
    } else {
        Err(malformed(id, "expected outcomes [true, false]"))
    }
}

fn malformed(id: NodeId, reason: &str) -> CallRecError {
    NetworkError::InvalidCpt {
        node: id.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
