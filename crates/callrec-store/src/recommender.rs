//! CallRecommender: run a `CallQuery` against a pooled model in one call.

use std::sync::Arc;

use callrec_core::config::{CallRecConfig, QueryConfig};
use callrec_core::errors::{CallRecError, CallRecResult, ModelStoreError};
use callrec_core::traits::IUsageRecordSource;
use callrec_core::TypeName;
use callrec_network::{CallQuery, QueryResult};

use crate::store::ModelStore;

/// Result of a recommendation request. Missing and busy models are
/// expected conditions, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Ranked(QueryResult),
    /// No mined data for the type.
    NoModel,
    /// Every pool slot is in use. Try again later.
    Unavailable,
}

impl QueryOutcome {
    pub fn ranked(&self) -> Option<&QueryResult> {
        match self {
            Self::Ranked(result) => Some(result),
            _ => None,
        }
    }
}

pub struct CallRecommender {
    store: Arc<ModelStore>,
    defaults: QueryConfig,
}

impl CallRecommender {
    pub fn new(store: Arc<ModelStore>, defaults: QueryConfig) -> Self {
        Self { store, defaults }
    }

    pub fn from_config(source: Arc<dyn IUsageRecordSource>, config: &CallRecConfig) -> Self {
        Self::new(
            Arc::new(ModelStore::from_config(source, config)),
            config.query.clone(),
        )
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// A query preloaded with the configured thresholds.
    pub fn query(&self) -> CallQuery {
        CallQuery::from_config(&self.defaults)
    }

    pub fn recommend(
        &self,
        type_name: &TypeName,
        query: &CallQuery,
    ) -> CallRecResult<QueryOutcome> {
        match self.store.with_model(type_name, |network| query.run(network)) {
            Ok(result) => Ok(QueryOutcome::Ranked(result)),
            Err(CallRecError::ModelStore(ModelStoreError::NoModel { .. })) => {
                Ok(QueryOutcome::NoModel)
            }
            Err(CallRecError::ModelStore(ModelStoreError::PoolExhausted { .. })) => {
                Ok(QueryOutcome::Unavailable)
            }
            Err(e) => Err(e),
        }
    }
}
