//! CPT construction for each layer.
//!
//! Every table is laid out row-major over the node's parents (first parent
//! slowest) with the node's own outcomes in the innermost position.

use std::collections::HashSet;

use callrec_core::constants::{
    AVAILABILITY_PRECISION, NONE_PATTERN, PATTERN_PRECISION, P_MAX, P_MIN,
};
use callrec_core::probability::{
    cell_floor, clamped_distribution, fit_row, safe_ratio, to_cell, to_cell_within,
};
use callrec_core::{MethodName, UsageRecord};

use super::contexts::ContextTable;

/// Prior over contexts: normalized observation frequencies.
pub fn context_prior(table: &ContextTable) -> Vec<f64> {
    let weights: Vec<f64> = table.totals().iter().map(|&t| t as f64).collect();
    clamped_distribution(&weights)
}

/// P(available | context): share of a context's observations that belong
/// to patterns invoking at least one method.
pub fn availability_cpt(table: &ContextTable, records: &[UsageRecord]) -> Vec<f64> {
    let mut used = vec![0u64; table.len()];
    for record in records.iter().filter(|r| !r.is_empty()) {
        for (slot, count) in used.iter_mut().zip(table.counts_for(record)) {
            *slot += count;
        }
    }

    let mut cpt = Vec::with_capacity(table.len() * 2);
    for (&used, &total) in used.iter().zip(table.totals()) {
        let p = to_cell(safe_ratio(used as f64, total as f64), AVAILABILITY_PRECISION);
        cpt.push(p);
        cpt.push(1.0 - p);
    }
    cpt
}

/// P(pattern | context, available). `patterns` holds the non-empty records
/// in outcome order; outcome 0 is `none`.
pub fn pattern_cpt(table: &ContextTable, patterns: &[&UsageRecord]) -> Vec<f64> {
    let outcomes = patterns.len() + 1;
    let counts: Vec<Vec<u64>> = patterns.iter().map(|r| table.counts_for(r)).collect();

    let mut cpt = Vec::with_capacity(table.len() * 2 * outcomes);
    for (ctx, &total) in table.totals().iter().enumerate() {
        cpt.extend(available_row(&counts, ctx, total));
        cpt.extend(unavailable_row(outcomes));
    }
    cpt
}

fn available_row(counts: &[Vec<u64>], ctx: usize, total: u64) -> Vec<f64> {
    if counts.is_empty() {
        return vec![1.0];
    }
    let floor = cell_floor(counts.len() + 1);
    let mut row = Vec::with_capacity(counts.len() + 1);
    row.push(0.0);
    for pattern_counts in counts {
        row.push(to_cell_within(
            safe_ratio(pattern_counts[ctx] as f64, total as f64),
            PATTERN_PRECISION,
            floor,
        ));
    }
    row[0] = (1.0 - row[1..].iter().sum::<f64>()).clamp(floor, 1.0 - floor);
    fit_row(&mut row, floor);
    row
}

/// Without the object in use, `none` takes all but the floor mass.
fn unavailable_row(outcomes: usize) -> Vec<f64> {
    if outcomes == 1 {
        return vec![1.0];
    }
    let floor = cell_floor(outcomes);
    let mut row = vec![floor; outcomes];
    row[0] = 1.0 - floor * (outcomes - 1) as f64;
    row
}

/// P(method called | pattern): near-certain for patterns that invoke it,
/// near-impossible otherwise and for `none`.
pub fn method_cpt(method: &MethodName, patterns: &[&UsageRecord]) -> Vec<f64> {
    let mut cpt = Vec::with_capacity((patterns.len() + 1) * 2);
    cpt.extend([P_MIN, P_MAX]);
    for record in patterns {
        if record.invokes(method) {
            cpt.extend([P_MAX, P_MIN]);
        } else {
            cpt.extend([P_MIN, P_MAX]);
        }
    }
    cpt
}

/// Outcome labels of the pattern node: `none`, then each record's name or
/// `pattern<n>` (1-based), made unique with a `#<k>` suffix.
pub fn pattern_names(patterns: &[&UsageRecord]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::from([NONE_PATTERN.to_string()]);
    let mut names = vec![NONE_PATTERN.to_string()];
    for (i, record) in patterns.iter().enumerate() {
        let base = record
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("pattern{}", i + 1));
        let mut name = base.clone();
        let mut suffix = 2;
        while taken.contains(&name) {
            name = format!("{base}#{suffix}");
            suffix += 1;
        }
        taken.insert(name.clone());
        names.push(name);
    }
    names
}
