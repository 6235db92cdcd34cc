use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fmk_core::{AttributeStore, FmkError, FmkResult, RecordHandle, RecordSource};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// A write that reached the in-memory vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub path: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: BTreeMap<String, Vec<RecordHandle>>,
    metadata: HashMap<String, BTreeMap<String, String>>,
    writes: Vec<RecordedWrite>,
    failing_paths: HashSet<String>,
    read_delays: HashMap<String, Duration>,
}

/// In-memory record source and attribute store.
///
/// Stands in for a real vault in tests. Supports injected write failures and
/// per-record read latency so completion order can be shuffled on purpose.
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<MemoryState>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an empty collection.
    pub fn add_collection(&self, collection: &str) {
        self.state()
            .collections
            .entry(collection.to_string())
            .or_default();
    }

    /// Append a record to `collection`, creating the collection if needed.
    pub fn add_record(
        &self,
        collection: &str,
        basename: &str,
        modified: DateTime<Utc>,
        attributes: &[(&str, &str)],
    ) -> RecordHandle {
        let path = format!("{}/{}.md", collection.trim_end_matches('/'), basename);
        let record = RecordHandle::new(path.clone(), basename, modified);

        let mut state = self.state();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        state.metadata.insert(
            path,
            attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        record
    }

    pub fn value(&self, path: &str, key: &str) -> Option<String> {
        self.state()
            .metadata
            .get(path)
            .and_then(|attrs| attrs.get(key).cloned())
    }

    /// Every successful write, in completion order.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state().writes.clone()
    }

    /// Make every write to `path` fail.
    pub fn fail_writes_for(&self, path: &str) {
        self.state().failing_paths.insert(path.to_string());
    }

    /// Delay reads of `path` by `delay`.
    pub fn delay_reads_for(&self, path: &str, delay: Duration) {
        self.state().read_delays.insert(path.to_string(), delay);
    }
}

#[async_trait]
impl RecordSource for MemoryVault {
    async fn is_collection(&self, path: &str) -> bool {
        self.state().collections.contains_key(path)
    }

    async fn list(&self, path: &str) -> FmkResult<Vec<RecordHandle>> {
        self.state()
            .collections
            .get(path)
            .cloned()
            .ok_or_else(|| FmkError::RecordSourceInvalid {
                path: path.to_string(),
            })
    }
}

#[async_trait]
impl AttributeStore for MemoryVault {
    async fn read(&self, record: &RecordHandle, key: &str) -> FmkResult<String> {
        let delay = self.state().read_delays.get(&record.path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        let attrs = state
            .metadata
            .get(&record.path)
            .ok_or_else(|| FmkError::NotFound(record.path.clone()))?;
        match attrs.get(key) {
            Some(value) => Ok(value.clone()),
            None => {
                tracing::warn!("Key '{}' not in front matter of {}", key, record.path);
                Ok(String::new())
            }
        }
    }

    async fn write(&self, record: &RecordHandle, key: &str, value: &str) -> FmkResult<()> {
        let mut state = self.state();
        if state.failing_paths.contains(&record.path) {
            return Err(FmkError::WriteFailure {
                path: record.path.clone(),
                key: key.to_string(),
                reason: "write rejected".to_string(),
            });
        }

        let attrs = state
            .metadata
            .get_mut(&record.path)
            .ok_or_else(|| FmkError::NotFound(record.path.clone()))?;
        if attrs.insert(key.to_string(), value.to_string()).is_none() {
            tracing::warn!(
                "Key '{}' not in front matter of {}, creating it",
                key,
                record.path
            );
        }
        state.writes.push(RecordedWrite {
            path: record.path.clone(),
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}
