use std::collections::BTreeMap;

use callrec_core::errors::CallRecResult;
use callrec_core::traits::IUsageRecordSource;
use callrec_core::{TypeName, UsageRecord};

/// Records held in memory, keyed by type.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    records: BTreeMap<TypeName, Vec<UsageRecord>>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: TypeName, records: Vec<UsageRecord>) -> Self {
        self.insert(type_name, records);
        self
    }

    /// Add records to a type, appending to any already present.
    pub fn insert(&mut self, type_name: TypeName, records: Vec<UsageRecord>) {
        self.records.entry(type_name).or_default().extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IUsageRecordSource for InMemoryRecordSource {
    fn available_types(&self) -> CallRecResult<Vec<TypeName>> {
        Ok(self.records.keys().cloned().collect())
    }

    fn load_records(&self, type_name: &TypeName) -> CallRecResult<Vec<UsageRecord>> {
        Ok(self.records.get(type_name).cloned().unwrap_or_default())
    }
}
