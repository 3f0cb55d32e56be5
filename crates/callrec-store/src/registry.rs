//! TypeRegistry: the set of types with mined data, loaded once.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use callrec_core::errors::{CallRecError, CallRecResult, ModelStoreError};
use callrec_core::traits::IUsageRecordSource;
use callrec_core::TypeName;

/// Compute-once registry. Concurrent first callers serialize on `loading`
/// and all observe the same set. A failed listing is not memoized.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: OnceLock<HashSet<TypeName>>,
    loading: Mutex<()>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &self,
        source: &dyn IUsageRecordSource,
    ) -> CallRecResult<&HashSet<TypeName>> {
        if let Some(types) = self.types.get() {
            return Ok(types);
        }
        let _guard = self
            .loading
            .lock()
            .map_err(|e| CallRecError::ConcurrencyError(e.to_string()))?;
        if let Some(types) = self.types.get() {
            return Ok(types);
        }
        let listed = source.available_types().map_err(unavailable)?;
        Ok(self.types.get_or_init(|| listed.into_iter().collect()))
    }
}

fn unavailable(err: CallRecError) -> CallRecError {
    match err {
        CallRecError::ModelStore(ModelStoreError::RegistryUnavailable { .. }) => err,
        other => ModelStoreError::RegistryUnavailable {
            reason: other.to_string(),
        }
        .into(),
    }
}
