//! CallQuery: one full evidence → update → rank cycle.

use serde::Serialize;

use callrec_core::config::QueryConfig;
use callrec_core::errors::CallRecResult;
use callrec_core::traits::IDiscreteNetwork;
use callrec_core::{MethodName, TypeName};

use crate::network::UsageNetwork;
use crate::recommendation::{EvidenceSummary, PatternProbability, Recommendation};

/// Everything known about a variable at the point recommendations are wanted.
#[derive(Debug, Clone)]
pub struct CallQuery {
    context: Option<MethodName>,
    observed_calls: Vec<MethodName>,
    rebase_type: Option<TypeName>,
    negate_constructors: bool,
    pattern: Option<String>,
    min_probability: f64,
    max_recommendations: Option<usize>,
    min_pattern_probability: Option<f64>,
}

impl Default for CallQuery {
    fn default() -> Self {
        Self::from_config(&QueryConfig::default())
    }
}

impl CallQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thresholds taken from `config`; no evidence yet.
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            context: None,
            observed_calls: Vec::new(),
            rebase_type: None,
            negate_constructors: false,
            pattern: None,
            min_probability: config.min_probability,
            max_recommendations: Some(config.max_recommendations),
            min_pattern_probability: Some(config.min_pattern_probability),
        }
    }

    /// The enclosing method the variable is used in.
    pub fn context(mut self, context: MethodName) -> Self {
        self.context = Some(context);
        self
    }

    /// Calls already made on the variable.
    pub fn observed_calls(mut self, calls: impl IntoIterator<Item = MethodName>) -> Self {
        self.observed_calls.extend(calls);
        self
    }

    /// Match observed calls against this type's model (subtype receivers).
    pub fn rebase_type(mut self, base: TypeName) -> Self {
        self.rebase_type = Some(base);
        self
    }

    /// Treat every constructor as not called, e.g. for receivers that were
    /// passed in rather than created locally.
    pub fn negate_constructors(mut self, negate: bool) -> Self {
        self.negate_constructors = negate;
        self
    }

    pub fn pattern(mut self, name: impl Into<String>) -> Self {
        self.pattern = Some(name.into());
        self
    }

    pub fn min_probability(mut self, min: f64) -> Self {
        self.min_probability = min;
        self
    }

    /// `None` returns every call above the threshold.
    pub fn max_recommendations(mut self, max: Option<usize>) -> Self {
        self.max_recommendations = max;
        self
    }

    /// Report patterns whose posterior is at least `min`.
    pub fn with_patterns(mut self, min: f64) -> Self {
        self.min_pattern_probability = Some(min);
        self
    }

    /// Skip pattern posteriors entirely.
    pub fn without_patterns(mut self) -> Self {
        self.min_pattern_probability = None;
        self
    }

    /// Clear, apply evidence, update beliefs and rank.
    pub fn run<N: IDiscreteNetwork>(
        &self,
        network: &mut UsageNetwork<N>,
    ) -> CallRecResult<QueryResult> {
        let span = callrec_observability::query_span!(network.type_name());
        let _guard = span.enter();

        network.clear_evidence()?;
        let context_known = match &self.context {
            Some(context) => network.set_method_context(context)?,
            None => false,
        };
        let pattern_known = match &self.pattern {
            Some(name) => network.set_pattern(name)?,
            None => false,
        };
        let evidence =
            network.set_observed_method_calls(self.rebase_type.as_ref(), &self.observed_calls)?;
        if self.negate_constructors {
            network.negate_constructors()?;
        }
        network.update_beliefs()?;

        let recommendations =
            network.recommended_method_calls(self.min_probability, self.max_recommendations)?;
        let patterns = match self.min_pattern_probability {
            Some(min) => network.patterns_with_probability(min)?,
            None => Vec::new(),
        };

        Ok(QueryResult {
            recommendations,
            patterns,
            context_known,
            pattern_known,
            evidence,
        })
    }
}

/// Output of one `CallQuery::run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub recommendations: Vec<Recommendation>,
    /// Empty after `without_patterns`.
    pub patterns: Vec<PatternProbability>,
    /// Whether the context had a dedicated outcome in the model.
    pub context_known: bool,
    pub pattern_known: bool,
    pub evidence: EvidenceSummary,
}

impl QueryResult {
    pub fn methods(&self) -> impl Iterator<Item = &MethodName> {
        self.recommendations.iter().map(|r| &r.method)
    }
}
