use crate::frontmatter::FrontmatterDocument;
use crate::store::atomic_writer::AtomicWriter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fmk_core::{AttributeStore, FmkError, FmkResult, RecordHandle, RecordSource};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

const NOTE_EXTENSION: &str = "md";

/// A directory of markdown notes acting as both record source and attribute store.
///
/// Record paths are relative to the vault root and always use `/` separators.
/// Front matter rewrites of the same note are serialized so concurrent writes
/// to different keys never lose each other's changes.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    write_locks: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl VaultStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            write_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolve a vault-relative path. Parent and root components are dropped
    /// so nothing outside the vault is reachable.
    fn resolve(&self, relative: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            if let Component::Normal(part) = component {
                resolved.push(part);
            }
        }
        resolved
    }

    fn relative_path(&self, absolute: &Path) -> String {
        let relative = absolute.strip_prefix(&self.root).unwrap_or(absolute);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    async fn load_document(&self, record: &RecordHandle) -> FmkResult<(PathBuf, FrontmatterDocument)> {
        let path = self.resolve(&record.path);
        let content = AtomicWriter::read_to_string(&path).await?;
        let document = FrontmatterDocument::parse(&content)?;
        Ok((path, document))
    }
}

#[async_trait]
impl RecordSource for VaultStore {
    async fn is_collection(&self, path: &str) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn list(&self, path: &str) -> FmkResult<Vec<RecordHandle>> {
        if !self.is_collection(path).await {
            return Err(FmkError::RecordSourceInvalid {
                path: path.to_string(),
            });
        }

        let mut entries = tokio::fs::read_dir(self.resolve(path)).await?;
        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let entry_path = entry.path();
            if entry_path.extension().and_then(|e| e.to_str()) != Some(NOTE_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Some(basename) = entry_path.file_stem().map(|s| s.to_string_lossy().to_string())
            else {
                continue;
            };
            let modified: DateTime<Utc> = metadata.modified()?.into();
            records.push(RecordHandle::new(
                self.relative_path(&entry_path),
                basename,
                modified,
            ));
        }

        records.sort_by(|a, b| a.basename.cmp(&b.basename).then_with(|| a.path.cmp(&b.path)));
        tracing::debug!("Listed {} records in '{}'", records.len(), path);
        Ok(records)
    }
}

#[async_trait]
impl AttributeStore for VaultStore {
    async fn read(&self, record: &RecordHandle, key: &str) -> FmkResult<String> {
        let (_, document) = self.load_document(record).await?;
        match document.get(key) {
            Some(value) => Ok(value),
            None => {
                tracing::warn!("Key '{}' not in front matter of {}", key, record.path);
                Ok(String::new())
            }
        }
    }

    async fn write(&self, record: &RecordHandle, key: &str, value: &str) -> FmkResult<()> {
        let lock = self.lock_for(&self.resolve(&record.path));
        let _guard = lock.lock().await;

        let (path, mut document) = self.load_document(record).await?;
        if !document.contains_key(key) {
            tracing::warn!(
                "Key '{}' not in front matter of {}, creating it",
                key,
                record.path
            );
        }
        document.set(key, value);
        let content = document.render()?;
        AtomicWriter::write_atomic(&path, content.as_bytes()).await?;

        tracing::debug!("Wrote {}={} to {}", key, value, record.path);
        Ok(())
    }
}
