//! Calling-context aggregation.

use std::collections::{BTreeMap, HashMap};

use callrec_core::constants::UNKNOWN_CONTEXT;
use callrec_core::errors::CallRecResult;
use callrec_core::{MethodName, UsageRecord};

/// Contexts that become outcomes of the context node, with their total
/// observation counts. Sparse contexts share the trailing unknown bucket.
#[derive(Debug, Clone)]
pub struct ContextTable {
    contexts: Vec<MethodName>,
    totals: Vec<u64>,
    buckets: HashMap<MethodName, usize>,
}

impl ContextTable {
    /// Sum context counts over all records and fold every context seen fewer
    /// than `min_support` times into the unknown context.
    pub fn aggregate(records: &[UsageRecord], min_support: u32) -> CallRecResult<Self> {
        let mut sums: BTreeMap<&MethodName, u64> = BTreeMap::new();
        for record in records {
            for (context, &count) in &record.observed_contexts {
                *sums.entry(context).or_insert(0) += u64::from(count);
            }
        }

        let unknown = MethodName::new(UNKNOWN_CONTEXT)?;
        let mut contexts = Vec::new();
        let mut totals = Vec::new();
        let mut buckets = HashMap::new();
        let mut unknown_total = 0u64;
        let mut merged = Vec::new();

        for (context, total) in sums {
            if total >= u64::from(min_support) && *context != unknown {
                buckets.insert(context.clone(), contexts.len());
                contexts.push(context.clone());
                totals.push(total);
            } else {
                unknown_total += total;
                merged.push(context.clone());
            }
        }

        let unknown_index = contexts.len();
        for context in merged {
            buckets.insert(context, unknown_index);
        }
        contexts.push(unknown);
        totals.push(unknown_total);

        Ok(Self {
            contexts,
            totals,
            buckets,
        })
    }

    /// Outcome labels: known contexts by identifier, then the unknown context.
    pub fn contexts(&self) -> &[MethodName] {
        &self.contexts
    }

    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn unknown_index(&self) -> usize {
        self.contexts.len() - 1
    }

    /// Bucket a raw context falls into.
    pub fn bucket_of(&self, context: &MethodName) -> usize {
        self.buckets
            .get(context)
            .copied()
            .unwrap_or_else(|| self.unknown_index())
    }

    /// The record's observation counts folded into buckets.
    pub fn counts_for(&self, record: &UsageRecord) -> Vec<u64> {
        let mut counts = vec![0u64; self.len()];
        for (context, &count) in &record.observed_contexts {
            counts[self.bucket_of(context)] += u64::from(count);
        }
        counts
    }
}
