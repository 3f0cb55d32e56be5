//! NetworkBuilder: usage records → `UsageNetwork`.
//!
//! Build order is fixed (context, availability, patterns, then one node per
//! method sorted by identifier) so the same records always produce the same
//! network.

pub mod contexts;
pub mod tables;

use std::collections::BTreeSet;

use callrec_core::config::BuilderConfig;
use callrec_core::constants::{
    AVAILABILITY_NODE, CONTEXT_NODE, PATTERN_NODE, STATE_FALSE, STATE_TRUE,
};
use callrec_core::errors::CallRecResult;
use callrec_core::traits::IDiscreteNetwork;
use callrec_core::{MethodName, TypeName, UsageRecord};
use callrec_observability::tracing_setup::events;

use crate::inference::BeliefNetwork;
use crate::network::UsageNetwork;

pub use contexts::ContextTable;

/// Builds usage networks from mined records.
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    config: BuilderConfig,
}

impl NetworkBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build on the default inference backend.
    pub fn build(
        &self,
        type_name: &TypeName,
        records: &[UsageRecord],
    ) -> CallRecResult<UsageNetwork<BeliefNetwork>> {
        self.build_with(type_name, records, BeliefNetwork::new())
    }

    /// Build into an empty `network` of any backend.
    pub fn build_with<N: IDiscreteNetwork>(
        &self,
        type_name: &TypeName,
        records: &[UsageRecord],
        mut network: N,
    ) -> CallRecResult<UsageNetwork<N>> {
        let span = callrec_observability::build_span!(type_name, records.len());
        let _guard = span.enter();

        let table = ContextTable::aggregate(records, self.config.min_context_support)?;
        let patterns: Vec<&UsageRecord> = records.iter().filter(|r| !r.is_empty()).collect();
        let methods: BTreeSet<&MethodName> =
            patterns.iter().flat_map(|r| r.invoked_methods.iter()).collect();
        let binary = [STATE_TRUE.to_string(), STATE_FALSE.to_string()];

        let context_labels: Vec<String> = table
            .contexts()
            .iter()
            .map(|c| c.identifier().to_string())
            .collect();
        let context = network.add_node(CONTEXT_NODE, &context_labels)?;
        network.set_cpt(context, tables::context_prior(&table))?;

        let availability = network.add_node(AVAILABILITY_NODE, &binary)?;
        network.add_arc(context, availability)?;
        network.set_cpt(availability, tables::availability_cpt(&table, records))?;

        let pattern = network.add_node(PATTERN_NODE, &tables::pattern_names(&patterns))?;
        network.add_arc(context, pattern)?;
        network.add_arc(availability, pattern)?;
        network.set_cpt(pattern, tables::pattern_cpt(&table, &patterns))?;

        for method in &methods {
            let node = network.add_node(method.identifier(), &binary)?;
            network.add_arc(pattern, node)?;
            network.set_cpt(node, tables::method_cpt(method, &patterns))?;
        }

        let usage = UsageNetwork::from_network(type_name.clone(), network)?;
        events::network_built(
            type_name.identifier(),
            table.len(),
            patterns.len(),
            methods.len(),
        );
        Ok(usage)
    }
}
