//! JsonDirectorySource: one JSON file per type in a flat directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use callrec_core::errors::{CallRecResult, ModelStoreError};
use callrec_core::traits::IUsageRecordSource;
use callrec_core::{TypeName, UsageRecord};

/// On-disk layout of `<escaped type>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecordsFile {
    pub type_name: TypeName,
    #[serde(default)]
    pub records: Vec<UsageRecord>,
}

/// File stem for a type: every non-word character becomes `_`.
///
/// `Ljava/io/File` → `Ljava_io_File`.
pub fn escape_type_name(type_name: &TypeName) -> String {
    type_name
        .identifier()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, type_name: &TypeName) -> PathBuf {
        self.root.join(format!("{}.json", escape_type_name(type_name)))
    }

    /// Write `records` for `type_name`, replacing any existing file.
    pub fn write(&self, type_name: &TypeName, records: &[UsageRecord]) -> CallRecResult<()> {
        let file = TypeRecordsFile {
            type_name: type_name.clone(),
            records: records.to_vec(),
        };
        let failed = |reason: String| ModelStoreError::LoadFailed {
            type_name: type_name.to_string(),
            reason,
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| failed(e.to_string()))?;
        std::fs::write(self.path_for(type_name), json).map_err(|e| failed(e.to_string()))?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<TypeRecordsFile, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))
    }
}

impl IUsageRecordSource for JsonDirectorySource {
    fn available_types(&self) -> CallRecResult<Vec<TypeName>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            ModelStoreError::RegistryUnavailable {
                reason: format!("{}: {e}", self.root.display()),
            }
        })?;

        let mut types = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match self.read(&path) {
                Ok(file) => types.push(file.type_name),
                Err(reason) => tracing::warn!(
                    event = "record_file_skipped",
                    reason = %reason,
                    "unreadable usage record file"
                ),
            }
        }
        types.sort();
        types.dedup();
        Ok(types)
    }

    fn load_records(&self, type_name: &TypeName) -> CallRecResult<Vec<UsageRecord>> {
        let failed = |reason: String| ModelStoreError::LoadFailed {
            type_name: type_name.to_string(),
            reason,
        };
        let file = self.read(&self.path_for(type_name)).map_err(failed)?;
        if file.type_name != *type_name {
            return Err(failed(format!(
                "file holds records of {}",
                file.type_name
            ))
            .into());
        }
        Ok(file.records)
    }
}
