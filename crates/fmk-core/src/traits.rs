use async_trait::async_trait;

use crate::{FmkResult, RecordHandle};

/// Enumerates records inside a collection (a folder of notes).
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Whether `path` resolves to a collection that can be listed.
    async fn is_collection(&self, path: &str) -> bool;

    /// Ordered listing of the records directly inside `path`.
    ///
    /// Returns `FmkError::RecordSourceInvalid` when `path` is not a collection.
    async fn list(&self, path: &str) -> FmkResult<Vec<RecordHandle>>;
}

/// Per-record key/value metadata.
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Current scalar value of `key`, or an empty string when the key is absent.
    async fn read(&self, record: &RecordHandle, key: &str) -> FmkResult<String>;

    /// Upsert `key` to `value`, creating the key when absent.
    ///
    /// Other keys of the record are left untouched.
    async fn write(&self, record: &RecordHandle, key: &str, value: &str) -> FmkResult<()>;
}
