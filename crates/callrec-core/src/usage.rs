//! Mined usage records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::names::MethodName;

/// One observed usage pattern of a type: which methods were invoked and in
/// which calling contexts the pattern was seen, how often.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Optional pattern name assigned by the miner.
    #[serde(default)]
    pub name: Option<String>,
    /// Methods invoked on the object in this pattern.
    #[serde(default)]
    pub invoked_methods: BTreeSet<MethodName>,
    /// Calling context → number of observations.
    #[serde(default)]
    pub observed_contexts: BTreeMap<MethodName, u32>,
}

impl UsageRecord {
    pub fn new(
        name: Option<String>,
        invoked_methods: impl IntoIterator<Item = MethodName>,
        observed_contexts: impl IntoIterator<Item = (MethodName, u32)>,
    ) -> Self {
        let mut contexts = BTreeMap::new();
        for (ctx, count) in observed_contexts {
            *contexts.entry(ctx).or_insert(0u32) += count;
        }
        Self {
            name,
            invoked_methods: invoked_methods.into_iter().collect(),
            observed_contexts: contexts,
        }
    }

    /// Whether the pattern calls anything at all.
    pub fn is_empty(&self) -> bool {
        self.invoked_methods.is_empty()
    }

    pub fn invokes(&self, method: &MethodName) -> bool {
        self.invoked_methods.contains(method)
    }

    /// Observations of this pattern in `context` (0 if never seen there).
    pub fn observations_in(&self, context: &MethodName) -> u64 {
        self.observed_contexts.get(context).copied().map_or(0, u64::from)
    }

    pub fn total_observations(&self) -> u64 {
        self.observed_contexts.values().map(|&c| u64::from(c)).sum()
    }
}
