//! ModelStore: per-type templates and a bounded pool of lendable instances.
//!
//! Acquire path:
//! 1. registry check (`NoModel` before any pool or builder work)
//! 2. idle instance of the same type, if any
//! 3. reserve a live slot, evicting one idle instance of any type when full
//! 4. clone the type's template, building it on first use
//!
//! Every instance handed out has its evidence cleared.

use std::sync::Arc;

use moka::sync::Cache;

use callrec_core::config::{CallRecConfig, StoreConfig};
use callrec_core::errors::{CallRecError, CallRecResult, ModelStoreError};
use callrec_core::traits::IUsageRecordSource;
use callrec_core::TypeName;
use callrec_network::{NetworkBuilder, UsageNetwork};
use callrec_observability::tracing_setup::events;
use callrec_observability::{StoreMetrics, StoreMetricsSnapshot};

use crate::pool::{ModelPool, Reservation};
use crate::registry::TypeRegistry;

pub struct ModelStore {
    source: Arc<dyn IUsageRecordSource>,
    builder: NetworkBuilder,
    registry: TypeRegistry,
    templates: Cache<TypeName, Arc<UsageNetwork>>,
    pool: ModelPool,
    metrics: StoreMetrics,
}

impl ModelStore {
    pub fn new(
        source: Arc<dyn IUsageRecordSource>,
        config: &StoreConfig,
        builder: NetworkBuilder,
    ) -> Self {
        Self {
            source,
            builder,
            registry: TypeRegistry::new(),
            templates: Cache::builder()
                .max_capacity(config.template_cache_capacity)
                .build(),
            pool: ModelPool::new(config.max_total_models, config.max_idle_per_type),
            metrics: StoreMetrics::new(),
        }
    }

    pub fn from_config(source: Arc<dyn IUsageRecordSource>, config: &CallRecConfig) -> Self {
        Self::new(
            source,
            &config.store,
            NetworkBuilder::new(config.builder.clone()),
        )
    }

    /// Whether mined data exists for `type_name`.
    pub fn has_model(&self, type_name: &TypeName) -> CallRecResult<bool> {
        Ok(self
            .registry
            .get_or_load(self.source.as_ref())?
            .contains(type_name))
    }

    /// Every type with mined data, sorted.
    pub fn available_types(&self) -> CallRecResult<Vec<TypeName>> {
        let mut types: Vec<TypeName> = self
            .registry
            .get_or_load(self.source.as_ref())?
            .iter()
            .cloned()
            .collect();
        types.sort();
        Ok(types)
    }

    /// Borrow an instance for `type_name`. The caller owns it until
    /// `release_model`; dropping it instead leaks its pool slot.
    pub fn acquire_model(&self, type_name: &TypeName) -> CallRecResult<UsageNetwork> {
        if !self.has_model(type_name)? {
            self.metrics.record_rejected_type();
            return Err(ModelStoreError::NoModel {
                type_name: type_name.to_string(),
            }
            .into());
        }

        if let Some(mut network) = self.pool.take_idle(type_name) {
            if let Err(e) = network.clear_evidence() {
                self.pool.free_slot();
                return Err(e);
            }
            self.metrics.record_reuse();
            events::model_acquired(type_name.identifier(), true, self.pool.live());
            return Ok(network);
        }

        match self.pool.reserve() {
            Reservation::Fresh => {}
            Reservation::Evicted(victim) => {
                self.metrics.record_eviction();
                events::model_evicted(victim.identifier());
            }
            Reservation::Exhausted { live, max } => {
                self.metrics.record_exhaustion();
                events::pool_exhausted(type_name.identifier(), live, max);
                return Err(ModelStoreError::PoolExhausted { live, max }.into());
            }
        }

        match self.fresh_instance(type_name) {
            Ok(network) => {
                self.metrics.record_instance_created();
                events::model_acquired(type_name.identifier(), false, self.pool.live());
                Ok(network)
            }
            Err(e) => {
                self.pool.free_slot();
                Err(e)
            }
        }
    }

    /// Return a borrowed instance. It is kept for reuse while its type has
    /// fewer than `max_idle_per_type` idle instances, otherwise dropped.
    pub fn release_model(&self, network: UsageNetwork) {
        let type_name = network.type_name().clone();
        let kept = self.pool.put_back(network);
        self.metrics.record_release();
        events::model_released(type_name.identifier(), kept);
    }

    /// Acquire, run `f`, and release even when `f` fails.
    pub fn with_model<R>(
        &self,
        type_name: &TypeName,
        f: impl FnOnce(&mut UsageNetwork) -> CallRecResult<R>,
    ) -> CallRecResult<R> {
        let mut network = self.acquire_model(type_name)?;
        let result = f(&mut network);
        self.release_model(network);
        result
    }

    /// Instances currently lent out or idle.
    pub fn live_models(&self) -> usize {
        self.pool.live()
    }

    pub fn idle_models(&self) -> usize {
        self.pool.idle()
    }

    pub fn idle_models_of(&self, type_name: &TypeName) -> usize {
        self.pool.idle_of(type_name)
    }

    pub fn max_models(&self) -> usize {
        self.pool.max_total()
    }

    pub fn metrics(&self) -> StoreMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Drop every cached template. Lent and idle instances are unaffected.
    pub fn invalidate_templates(&self) {
        self.templates.invalidate_all();
    }

    fn fresh_instance(&self, type_name: &TypeName) -> CallRecResult<UsageNetwork> {
        let template = self
            .templates
            .try_get_with(type_name.clone(), || self.build_template(type_name))
            .map_err(|shared| match Arc::try_unwrap(shared) {
                Ok(err) => err,
                Err(shared) => ModelStoreError::LoadFailed {
                    type_name: type_name.to_string(),
                    reason: shared.to_string(),
                }
                .into(),
            })?;
        let mut network: UsageNetwork = (*template).clone();
        network.clear_evidence()?;
        Ok(network)
    }

    fn build_template(&self, type_name: &TypeName) -> CallRecResult<Arc<UsageNetwork>> {
        let records = self.source.load_records(type_name).map_err(|e| {
            self.metrics.record_load_failure();
            let reason = match &e {
                CallRecError::ModelStore(ModelStoreError::LoadFailed { reason, .. }) => {
                    reason.clone()
                }
                other => other.to_string(),
            };
            events::load_failed(type_name.identifier(), &reason);
            CallRecError::from(ModelStoreError::LoadFailed {
                type_name: type_name.to_string(),
                reason,
            })
        })?;
        let network = self.builder.build(type_name, &records)?;
        self.metrics.record_template_built();
        Ok(Arc::new(network))
    }
}
