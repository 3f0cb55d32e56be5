//! `IUsageRecordSource` implementations.

pub mod in_memory;
pub mod json_dir;

pub use in_memory::InMemoryRecordSource;
pub use json_dir::{escape_type_name, JsonDirectorySource, TypeRecordsFile};
