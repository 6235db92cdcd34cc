use fmk_core::FmkResult;
use std::path::Path;
use tokio::fs;

/// Whole-file writes that never leave a half-written note behind.
///
/// Data goes to a temp file in the target's directory, which is then renamed
/// over the target.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> FmkResult<()> {
        // Same directory keeps the rename on one filesystem
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let temp_path = tempfile::Builder::new()
            .prefix(".fmk-")
            .suffix(".tmp")
            .tempfile_in(parent)?
            .into_temp_path();

        fs::write(&temp_path, data).await?;
        // Temp files are created 0600; keep the note's own mode
        if let Ok(metadata) = fs::metadata(path).await {
            fs::set_permissions(&temp_path, metadata.permissions()).await?;
        }
        fs::rename(&temp_path, path).await?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    pub async fn read_to_string(path: &Path) -> FmkResult<String> {
        let content = fs::read_to_string(path).await?;
        tracing::debug!("Read {} bytes from {}", content.len(), path.display());
        Ok(content)
    }
}
