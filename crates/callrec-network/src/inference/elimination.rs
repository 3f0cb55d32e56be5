//! Exact posterior marginals by variable elimination.

use std::collections::{BTreeSet, HashMap};

use super::factor::Factor;

/// Everything elimination needs to know about one variable.
pub struct Variable<'a> {
    pub parents: &'a [usize],
    pub card: usize,
    pub cpt: &'a [f64],
    pub evidence: Option<usize>,
}

/// Unnormalized posterior over `query` given all evidence in `vars`.
///
/// Only ancestors of the query and of evidence variables take part; every
/// other variable sums to one and can be dropped without changing the result.
pub fn unnormalized_marginal(vars: &HashMap<usize, Variable<'_>>, query: usize) -> Factor {
    let mut seeds: Vec<usize> = vars
        .iter()
        .filter(|(_, v)| v.evidence.is_some())
        .map(|(&id, _)| id)
        .collect();
    seeds.push(query);
    let relevant = ancestors_of(vars, seeds);

    let mut factors: Vec<Factor> = relevant
        .iter()
        .filter_map(|id| vars.get(id).map(|v| (id, v)))
        .map(|(&id, v)| {
            let mut scope: Vec<usize> = v.parents.to_vec();
            scope.push(id);
            let cards = scope
                .iter()
                .map(|p| vars.get(p).map_or(1, |pv| pv.card))
                .collect();
            Factor::new(scope, cards, v.cpt.to_vec())
        })
        .collect();

    for &id in &relevant {
        if let Some(value) = vars.get(&id).and_then(|v| v.evidence) {
            for factor in factors.iter_mut() {
                if factor.contains(id) {
                    *factor = factor.restrict(id, value);
                }
            }
        }
    }

    let mut hidden: BTreeSet<usize> = relevant
        .iter()
        .copied()
        .filter(|&id| id != query && vars.get(&id).is_some_and(|v| v.evidence.is_none()))
        .collect();

    while let Some(next) = cheapest_to_eliminate(&factors, &hidden) {
        hidden.remove(&next);
        let (touching, rest): (Vec<Factor>, Vec<Factor>) =
            factors.into_iter().partition(|f| f.contains(next));
        factors = rest;
        let joined = touching
            .iter()
            .fold(Factor::unit(), |acc, f| acc.product(f));
        factors.push(joined.sum_out(next));
    }

    factors
        .iter()
        .fold(Factor::unit(), |acc, f| acc.product(f))
}

/// Every variable reachable from `seeds` by walking parent links, seeds included.
fn ancestors_of(vars: &HashMap<usize, Variable<'_>>, seeds: Vec<usize>) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = seeds;
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(v) = vars.get(&id) {
            stack.extend(v.parents.iter().copied().filter(|p| !seen.contains(p)));
        }
    }
    seen
}

/// Min-size heuristic: the hidden variable whose elimination creates the
/// smallest intermediate factor. Ties go to the lowest id.
fn cheapest_to_eliminate(factors: &[Factor], hidden: &BTreeSet<usize>) -> Option<usize> {
    hidden
        .iter()
        .map(|&var| {
            let mut scope: HashMap<usize, usize> = HashMap::new();
            for f in factors.iter().filter(|f| f.contains(var)) {
                for (&v, &c) in f.vars().iter().zip(f.cards()) {
                    scope.insert(v, c);
                }
            }
            let size: usize = scope.values().product();
            (size, var)
        })
        .min()
        .map(|(_, var)| var)
}
