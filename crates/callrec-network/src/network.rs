//! `UsageNetwork`: the per-type model and its evidence/query protocol.

use std::collections::BTreeMap;

use callrec_core::constants::{AVAILABILITY_NODE, CONTEXT_NODE, PATTERN_NODE};
use callrec_core::errors::{CallRecResult, NetworkError};
use callrec_core::traits::IDiscreteNetwork;
use callrec_core::{MethodName, TypeName};
use callrec_observability::tracing_setup::events;

use crate::inference::BeliefNetwork;
use crate::nodes::{AvailabilityNode, ContextNode, MethodNode, PatternNode};
use crate::recommendation::{self, EvidenceSummary, PatternProbability, Recommendation};

/// Where a network stands in the evidence/query cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Only standing evidence (availability = true) is set.
    Idle,
    /// Evidence changed since the last belief update.
    EvidenceApplied,
    /// Marginals reflect the current evidence.
    BeliefsUpdated,
}

/// Bayesian model of how objects of one type are used.
///
/// Instances are owned by exactly one caller at a time; the model store hands
/// out clones of a shared template.
#[derive(Debug, Clone)]
pub struct UsageNetwork<N = BeliefNetwork> {
    type_name: TypeName,
    network: N,
    context: ContextNode,
    availability: AvailabilityNode,
    pattern: PatternNode,
    methods: BTreeMap<MethodName, MethodNode>,
    state: QueryState,
    /// Whether the current marginals were computed under standing evidence only.
    standing_beliefs: bool,
}

impl<N: IDiscreteNetwork> UsageNetwork<N> {
    /// Wrap a network that already has the four layers, locating nodes by
    /// name. Method nodes are the children of the pattern node.
    ///
    /// Standing evidence is asserted and beliefs are computed before return.
    pub fn from_network(type_name: TypeName, network: N) -> CallRecResult<Self> {
        let find = |name: &str| {
            network.node_id(name).ok_or_else(|| NetworkError::UnknownNode {
                node: name.to_string(),
            })
        };
        let context = ContextNode::discover(&network, find(CONTEXT_NODE)?)?;
        let availability = AvailabilityNode::discover(&network, find(AVAILABILITY_NODE)?)?;
        let pattern = PatternNode::discover(&network, find(PATTERN_NODE)?)?;

        let mut methods = BTreeMap::new();
        for child in network.children(pattern.id())? {
            let node = MethodNode::discover(&network, child)?;
            methods.insert(node.method().clone(), node);
        }

        let mut usage = Self {
            type_name,
            network,
            context,
            availability,
            pattern,
            methods,
            state: QueryState::Idle,
            standing_beliefs: false,
        };
        usage.clear_evidence()?;
        usage.update_beliefs()?;
        Ok(usage)
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    /// Read-only access to the backend network.
    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn context_node(&self) -> &ContextNode {
        &self.context
    }

    pub fn availability_node(&self) -> AvailabilityNode {
        self.availability
    }

    pub fn pattern_node(&self) -> &PatternNode {
        &self.pattern
    }

    pub fn method_nodes(&self) -> impl Iterator<Item = &MethodNode> {
        self.methods.values()
    }

    /// Methods the model knows, sorted by identifier.
    pub fn method_calls(&self) -> impl Iterator<Item = &MethodName> {
        self.methods.keys()
    }

    pub fn contexts(&self) -> &[MethodName] {
        self.context.contexts()
    }

    pub fn patterns(&self) -> &[String] {
        self.pattern.names()
    }

    /// Drop all evidence and re-assert availability = true.
    pub fn clear_evidence(&mut self) -> CallRecResult<()> {
        self.network.clear_all_evidence();
        self.availability.set_available(&mut self.network, true)?;
        self.state = QueryState::Idle;
        Ok(())
    }

    /// Condition on the calling context. Returns false, leaving the context
    /// unobserved, when the model has no dedicated outcome for it.
    pub fn set_method_context(&mut self, context: &MethodName) -> CallRecResult<bool> {
        match self.context.index_of(context) {
            Some(index) => {
                self.network.set_evidence(self.context.id(), index)?;
                self.touch();
                Ok(true)
            }
            None => {
                events::context_unknown(self.type_name.identifier(), context.identifier());
                Ok(false)
            }
        }
    }

    /// Mark one method as already called. False if the model lacks it.
    pub fn set_called(&mut self, method: &MethodName) -> CallRecResult<bool> {
        let Some(node) = self.methods.get(method) else {
            events::unknown_method_evidence(self.type_name.identifier(), method.identifier());
            return Ok(false);
        };
        node.set_called(&mut self.network, true)?;
        self.touch();
        Ok(true)
    }

    /// Mark every method in `invoked` as called, optionally rebasing each
    /// onto `rebase` first (a subtype's calls matched against a supertype).
    pub fn set_observed_method_calls<'a>(
        &mut self,
        rebase: Option<&TypeName>,
        invoked: impl IntoIterator<Item = &'a MethodName>,
    ) -> CallRecResult<EvidenceSummary> {
        let mut summary = EvidenceSummary::default();
        for method in invoked {
            let method = match rebase {
                Some(base) => method.rebase(base),
                None => method.clone(),
            };
            if self.set_called(&method)? {
                summary.applied += 1;
            } else {
                summary.ignored.push(method);
            }
        }
        Ok(summary)
    }

    /// Observe every constructor as not called. Returns how many nodes were set.
    pub fn negate_constructors(&mut self) -> CallRecResult<usize> {
        let mut negated = 0;
        for node in self.methods.values().filter(|n| n.method().is_init()) {
            node.set_called(&mut self.network, false)?;
            negated += 1;
        }
        if negated > 0 {
            self.touch();
        }
        Ok(negated)
    }

    /// Condition on a usage pattern by name. False if there is no such pattern.
    pub fn set_pattern(&mut self, name: &str) -> CallRecResult<bool> {
        let Some(index) = self.pattern.index_of(name) else {
            return Ok(false);
        };
        self.network.set_evidence(self.pattern.id(), index)?;
        self.touch();
        Ok(true)
    }

    pub fn update_beliefs(&mut self) -> CallRecResult<()> {
        self.network.update_beliefs()?;
        self.standing_beliefs = match self.state {
            QueryState::Idle => true,
            QueryState::EvidenceApplied => false,
            QueryState::BeliefsUpdated => self.standing_beliefs,
        };
        self.state = QueryState::BeliefsUpdated;
        Ok(())
    }

    /// Unobserved methods whose posterior is at least `min_probability`,
    /// best first, at most `max_count` of them.
    pub fn recommended_method_calls(
        &self,
        min_probability: f64,
        max_count: Option<usize>,
    ) -> CallRecResult<Vec<Recommendation>> {
        self.warn_if_stale();
        let mut candidates = Vec::new();
        for node in self.methods.values() {
            if node.is_observed(&self.network) {
                continue;
            }
            let probability = node.probability(&self.network)?;
            if probability >= min_probability {
                candidates.push(Recommendation::new(node.method().clone(), probability));
            }
        }
        Ok(recommendation::rank(candidates, max_count))
    }

    /// Pattern posteriors of at least `min_probability`, best first.
    pub fn patterns_with_probability(
        &self,
        min_probability: f64,
    ) -> CallRecResult<Vec<PatternProbability>> {
        self.warn_if_stale();
        let marginal = self.network.marginal(self.pattern.id())?;
        let mut patterns: Vec<PatternProbability> = self
            .pattern
            .names()
            .iter()
            .zip(marginal)
            .filter(|(_, &p)| p >= min_probability)
            .map(|(name, &probability)| PatternProbability {
                name: name.clone(),
                probability,
            })
            .collect();
        patterns.sort_by(PatternProbability::ranking);
        Ok(patterns)
    }

    fn touch(&mut self) {
        self.state = QueryState::EvidenceApplied;
    }

    /// Whether the marginals predate the current evidence.
    pub fn beliefs_stale(&self) -> bool {
        match self.state {
            QueryState::EvidenceApplied => true,
            QueryState::Idle => !self.standing_beliefs,
            QueryState::BeliefsUpdated => false,
        }
    }

    fn warn_if_stale(&self) {
        if self.beliefs_stale() {
            events::stale_beliefs(self.type_name.identifier());
        }
    }
}
