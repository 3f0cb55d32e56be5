//! `BeliefNetwork`: the default `IDiscreteNetwork` backend.
//!
//! Nodes live in a `petgraph::DiGraph`; arcs are checked for cycles as they
//! are added. `update_beliefs` runs variable elimination once per node.

pub mod elimination;
pub mod factor;

use std::collections::HashMap;

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use callrec_core::constants::ROW_SUM_TOLERANCE;
use callrec_core::errors::{CallRecResult, NetworkError};
use callrec_core::traits::{IDiscreteNetwork, NodeId};

use elimination::Variable;

/// A categorical variable with its CPT, evidence and last posterior.
#[derive(Debug, Clone)]
pub struct DiscreteNode {
    pub name: String,
    pub outcomes: Vec<String>,
    pub parents: Vec<NodeId>,
    pub cpt: Vec<f64>,
    pub evidence: Option<usize>,
    pub beliefs: Vec<f64>,
}

impl DiscreteNode {
    fn new(name: &str, outcomes: &[String]) -> Self {
        let uniform = uniform(outcomes.len());
        Self {
            name: name.to_string(),
            outcomes: outcomes.to_vec(),
            parents: Vec::new(),
            cpt: uniform.clone(),
            evidence: None,
            beliefs: uniform,
        }
    }

    fn card(&self) -> usize {
        self.outcomes.len()
    }
}

/// Graph type backing the network.
pub type BeliefGraph = DiGraph<DiscreteNode, ()>;

/// In-memory discrete Bayesian network with exact inference.
#[derive(Debug, Clone, Default)]
pub struct BeliefNetwork {
    graph: BeliefGraph,
    by_name: HashMap<String, NodeIndex>,
}

impl BeliefNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: NodeId) -> CallRecResult<&DiscreteNode> {
        self.graph
            .node_weight(NodeIndex::new(id.0))
            .ok_or_else(|| unknown(id))
    }

    fn node_mut(&mut self, id: NodeId) -> CallRecResult<&mut DiscreteNode> {
        self.graph
            .node_weight_mut(NodeIndex::new(id.0))
            .ok_or_else(|| unknown(id))
    }

    /// Number of CPT rows: product of the parents' cardinalities.
    fn row_count(&self, node: &DiscreteNode) -> usize {
        node.parents
            .iter()
            .filter_map(|p| self.graph.node_weight(NodeIndex::new(p.0)))
            .map(DiscreteNode::card)
            .product()
    }
}

impl IDiscreteNetwork for BeliefNetwork {
    fn add_node(&mut self, name: &str, outcomes: &[String]) -> CallRecResult<NodeId> {
        if outcomes.is_empty() {
            return Err(NetworkError::NoOutcomes {
                node: name.to_string(),
            }
            .into());
        }
        if self.by_name.contains_key(name) {
            return Err(NetworkError::DuplicateNode {
                node: name.to_string(),
            }
            .into());
        }
        let idx = self.graph.add_node(DiscreteNode::new(name, outcomes));
        self.by_name.insert(name.to_string(), idx);
        Ok(NodeId(idx.index()))
    }

    fn add_arc(&mut self, parent: NodeId, child: NodeId) -> CallRecResult<()> {
        let parent_name = self.node(parent)?.name.clone();
        let child_node = self.node(child)?;
        if child_node.parents.contains(&parent) {
            return Ok(());
        }
        let (p, c) = (NodeIndex::new(parent.0), NodeIndex::new(child.0));
        if p == c || has_path_connecting(&self.graph, c, p, None) {
            return Err(NetworkError::CycleDetected {
                parent: parent_name,
                child: child_node.name.clone(),
            }
            .into());
        }

        self.graph.add_edge(p, c, ());
        let parent_card = self.node(parent)?.card();
        let node = self.node_mut(child)?;
        node.parents.push(parent);
        let rows = node.cpt.len() / node.card() * parent_card;
        node.cpt = uniform(node.card()).repeat(rows);
        Ok(())
    }

    fn set_cpt(&mut self, node: NodeId, cpt: Vec<f64>) -> CallRecResult<()> {
        let target = self.node(node)?;
        let card = target.card();
        let expected = self.row_count(target) * card;
        if cpt.len() != expected {
            return Err(invalid_cpt(
                target,
                format!("expected {expected} cells, got {}", cpt.len()),
            ));
        }
        if let Some(bad) = cpt.iter().find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0) {
            return Err(invalid_cpt(target, format!("cell {bad} is not a probability")));
        }
        for (row_idx, row) in cpt.chunks(card).enumerate() {
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(invalid_cpt(target, format!("row {row_idx} sums to {sum}")));
            }
        }
        self.node_mut(node)?.cpt = cpt;
        Ok(())
    }

    fn set_evidence(&mut self, node: NodeId, outcome: usize) -> CallRecResult<()> {
        let target = self.node_mut(node)?;
        if outcome >= target.card() {
            return Err(NetworkError::UnknownOutcome {
                node: target.name.clone(),
                outcome: outcome.to_string(),
            }
            .into());
        }
        target.evidence = Some(outcome);
        Ok(())
    }

    fn clear_evidence(&mut self, node: NodeId) -> CallRecResult<()> {
        self.node_mut(node)?.evidence = None;
        Ok(())
    }

    fn clear_all_evidence(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.evidence = None;
        }
    }

    fn update_beliefs(&mut self) -> CallRecResult<()> {
        let parent_ids: Vec<Vec<usize>> = self
            .graph
            .node_weights()
            .map(|n| n.parents.iter().map(|p| p.0).collect())
            .collect();
        let vars: HashMap<usize, Variable<'_>> = self
            .graph
            .node_indices()
            .zip(&parent_ids)
            .map(|(idx, parents)| {
                let n = &self.graph[idx];
                (
                    idx.index(),
                    Variable {
                        parents,
                        card: n.card(),
                        cpt: &n.cpt,
                        evidence: n.evidence,
                    },
                )
            })
            .collect();

        let mut posteriors = Vec::with_capacity(vars.len());
        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            if let Some(value) = node.evidence {
                let mut one_hot = vec![0.0; node.card()];
                one_hot[value] = 1.0;
                posteriors.push(one_hot);
                continue;
            }
            let joint = elimination::unnormalized_marginal(&vars, idx.index());
            let z = joint.total();
            if !(z.is_finite() && z > 0.0) {
                return Err(NetworkError::ImpossibleEvidence {
                    node: node.name.clone(),
                }
                .into());
            }
            posteriors.push(joint.values().iter().map(|v| v / z).collect());
        }

        for (node, beliefs) in self.graph.node_weights_mut().zip(posteriors) {
            node.beliefs = beliefs;
        }
        Ok(())
    }

    fn marginal(&self, node: NodeId) -> CallRecResult<&[f64]> {
        Ok(&self.node(node)?.beliefs)
    }

    fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).map(|idx| NodeId(idx.index()))
    }

    fn node_name(&self, node: NodeId) -> CallRecResult<&str> {
        Ok(&self.node(node)?.name)
    }

    fn outcomes(&self, node: NodeId) -> CallRecResult<&[String]> {
        Ok(&self.node(node)?.outcomes)
    }

    fn evidence(&self, node: NodeId) -> Option<usize> {
        self.node(node).ok().and_then(|n| n.evidence)
    }

    fn parents(&self, node: NodeId) -> CallRecResult<&[NodeId]> {
        Ok(&self.node(node)?.parents)
    }

    fn children(&self, node: NodeId) -> CallRecResult<Vec<NodeId>> {
        self.node(node)?;
        let mut children: Vec<NodeId> = self
            .graph
            .neighbors_directed(NodeIndex::new(node.0), Direction::Outgoing)
            .map(|idx| NodeId(idx.index()))
            .collect();
        children.sort();
        Ok(children)
    }

    fn cpt(&self, node: NodeId) -> CallRecResult<&[f64]> {
        Ok(&self.node(node)?.cpt)
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

fn uniform(card: usize) -> Vec<f64> {
    vec![1.0 / card as f64; card]
}

fn unknown(id: NodeId) -> callrec_core::CallRecError {
    NetworkError::UnknownNode {
        node: id.to_string(),
    }
    .into()
}

fn invalid_cpt(node: &DiscreteNode, reason: String) -> callrec_core::CallRecError {
    NetworkError::InvalidCpt {
        node: node.name.clone(),
        reason,
    }
    .into()
}
