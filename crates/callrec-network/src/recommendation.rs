//! Query result types.

use std::cmp::Ordering;

use serde::Serialize;

use callrec_core::MethodName;

/// A method the caller has not invoked yet, with its posterior probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub method: MethodName,
    pub probability: f64,
}

impl Recommendation {
    pub fn new(method: MethodName, probability: f64) -> Self {
        Self {
            method,
            probability,
        }
    }

    /// Probability descending, then method identifier ascending.
    pub fn ranking(a: &Self, b: &Self) -> Ordering {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.method.identifier().cmp(b.method.identifier()))
    }
}

/// Posterior probability of one usage pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternProbability {
    pub name: String,
    pub probability: f64,
}

impl PatternProbability {
    /// Probability descending, then name ascending.
    pub fn ranking(a: &Self, b: &Self) -> Ordering {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// What happened to a batch of observed calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvidenceSummary {
    /// Calls that matched a method node and were set as evidence.
    pub applied: usize,
    /// Calls the network has no node for.
    pub ignored: Vec<MethodName>,
}

impl EvidenceSummary {
    pub fn is_complete(&self) -> bool {
        self.ignored.is_empty()
    }
}

/// Sort by ranking and keep at most `max` entries.
pub fn rank(mut items: Vec<Recommendation>, max: Option<usize>) -> Vec<Recommendation> {
    items.sort_by(Recommendation::ranking);
    if let Some(max) = max {
        items.truncate(max);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, p: f64) -> Recommendation {
        Recommendation::new(MethodName::new(id).unwrap(), p)
    }

    #[test]
    fn ties_break_on_identifier() {
        let ranked = rank(
            vec![
                rec("LA.b()V", 0.5),
                rec("LA.a()V", 0.5),
                rec("LA.c()V", 0.9),
            ],
            None,
        );
        let ids: Vec<&str> = ranked.iter().map(|r| r.method.identifier()).collect();
        assert_eq!(ids, ["LA.c()V", "LA.a()V", "LA.b()V"]);
    }

    #[test]
    fn truncation() {
        let ranked = rank(vec![rec("LA.a()V", 0.2), rec("LA.b()V", 0.3)], Some(1));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].method.identifier(), "LA.b()V");
    }
}
