//! Shared fixtures for callrec tests and benches: the file-usage scenario,
//! synthetic record generators, and instrumented record sources.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use callrec_core::errors::{CallRecError, CallRecResult, ModelStoreError};
use callrec_core::traits::IUsageRecordSource;
use callrec_core::{MethodName, TypeName, UsageRecord};

/// Directory holding the JSON fixtures of this crate.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// A type together with its mined records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub type_name: TypeName,
    pub records: Vec<UsageRecord>,
}

/// Method name shorthand. Panics on malformed input.
pub fn m(identifier: &str) -> MethodName {
    MethodName::new(identifier)
        .unwrap_or_else(|e| panic!("bad method fixture {identifier}: {e}"))
}

/// Type name shorthand. Panics on malformed input.
pub fn t(identifier: &str) -> TypeName {
    TypeName::new(identifier).unwrap_or_else(|e| panic!("bad type fixture {identifier}: {e}"))
}

/// Names used by the file scenario.
pub mod file {
    pub const TYPE: &str = "Ljava/io/File";
    pub const OPEN: &str = "Ljava/io/File.open()V";
    pub const READ: &str = "Ljava/io/File.read()I";
    pub const WRITE: &str = "Ljava/io/File.write(I)V";
    pub const CLOSE: &str = "Ljava/io/File.close()V";
    pub const INIT: &str = "Ljava/io/File.<init>(Ljava/lang/String;)V";
    pub const READER_CONTEXT: &str = "Lapp/Reader.load()V";
    pub const WRITER_CONTEXT: &str = "Lapp/Writer.save()V";
}

/// Pattern A (reader context, 30 observations: open/read/close) and
/// pattern B (writer context, 25 observations: open/write/close).
pub fn file_scenario() -> Scenario {
    load_fixture("file_scenario.json")
}

/// The file scenario with a constructor call added to both patterns, plus a
/// sparse third context that falls below the default support threshold.
pub fn file_scenario_with_constructors() -> Scenario {
    let mut scenario = file_scenario();
    for record in &mut scenario.records {
        record.invoked_methods.insert(m(file::INIT));
    }
    scenario.records.push(UsageRecord::new(
        Some("C".to_string()),
        [m(file::INIT), m(file::OPEN)],
        [(m("Lapp/Health.check()V"), 5)],
    ));
    scenario
}

/// A deterministic synthetic type: `patterns` records over `methods`
/// methods, each seen in one of `contexts` contexts. Record `i` invokes the
/// methods whose index is congruent to `i` or `i + 1` modulo 3, plus method 0.
pub fn synthetic_records(
    type_name: &TypeName,
    patterns: usize,
    methods: usize,
    contexts: usize,
) -> Vec<UsageRecord> {
    let method_names: Vec<MethodName> = (0..methods.max(1))
        .map(|j| m(&format!("{}.m{j}()V", type_name.identifier())))
        .collect();
    (0..patterns)
        .map(|i| {
            let invoked = method_names
                .iter()
                .enumerate()
                .filter(|(j, _)| *j == 0 || j % 3 == i % 3 || j % 3 == (i + 1) % 3)
                .map(|(_, name)| name.clone());
            let context = m(&format!("Lapp/Caller{}.run()V", i % contexts.max(1)));
            UsageRecord::new(Some(format!("p{i}")), invoked, [(context, 20 + i as u32)])
        })
        .collect()
}

/// In-memory source that counts calls and can be told to fail.
#[derive(Debug, Default)]
pub struct CountingSource {
    records: BTreeMap<TypeName, Vec<UsageRecord>>,
    failing: Mutex<Vec<TypeName>>,
    type_listings: AtomicUsize,
    loads: AtomicUsize,
}

impl CountingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: TypeName, records: Vec<UsageRecord>) -> Self {
        self.records.insert(type_name, records);
        self
    }

    pub fn with_scenario(self, scenario: Scenario) -> Self {
        self.with_type(scenario.type_name, scenario.records)
    }

    /// `count` distinct synthetic types named `Lgen/T<i>`.
    pub fn with_synthetic_types(mut self, count: usize) -> Self {
        for i in 0..count {
            let type_name = t(&format!("Lgen/T{i}"));
            let records = synthetic_records(&type_name, 3, 4, 2);
            self.records.insert(type_name, records);
        }
        self
    }

    /// Make every subsequent load of `type_name` fail until `heal` is called.
    pub fn fail_loads_of(&self, type_name: &TypeName) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(type_name.clone());
        }
    }

    pub fn heal(&self) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.clear();
        }
    }

    pub fn type_listings(&self) -> usize {
        self.type_listings.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl IUsageRecordSource for CountingSource {
    fn available_types(&self) -> CallRecResult<Vec<TypeName>> {
        self.type_listings.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.keys().cloned().collect())
    }

    fn load_records(&self, type_name: &TypeName) -> CallRecResult<Vec<UsageRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing
            .lock()
            .map_err(|e| CallRecError::ConcurrencyError(e.to_string()))?
            .contains(type_name);
        if failing {
            return Err(ModelStoreError::LoadFailed {
                type_name: type_name.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        Ok(self.records.get(type_name).cloned().unwrap_or_default())
    }
}

/// A source whose type listing always fails.
#[derive(Debug, Default)]
pub struct BrokenRegistrySource {
    pub attempts: AtomicUsize,
}

impl IUsageRecordSource for BrokenRegistrySource {
    fn available_types(&self) -> CallRecResult<Vec<TypeName>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ModelStoreError::RegistryUnavailable {
            reason: "index offline".to_string(),
        }
        .into())
    }

    fn load_records(&self, type_name: &TypeName) -> CallRecResult<Vec<UsageRecord>> {
        Err(ModelStoreError::LoadFailed {
            type_name: type_name.to_string(),
            reason: "index offline".to_string(),
        }
        .into())
    }
}
