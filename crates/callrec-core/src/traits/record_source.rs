use crate::errors::CallRecResult;
use crate::names::TypeName;
use crate::usage::UsageRecord;

/// Provider of mined usage data, keyed by type.
pub trait IUsageRecordSource: Send + Sync {
    /// Every type for which mined records exist.
    fn available_types(&self) -> CallRecResult<Vec<TypeName>>;

    /// All usage records of `type_name`.
    fn load_records(&self, type_name: &TypeName) -> CallRecResult<Vec<UsageRecord>>;
}
