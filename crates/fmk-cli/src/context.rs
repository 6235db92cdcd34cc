use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use fmk_core::AppConfig;
use fmk_domain::{first_board_block, BoardSession, ParseErrorView, SyncQueue};
use fmk_persistence::VaultStore;

pub struct CliContext {
    pub vault: Arc<VaultStore>,
    markdown_identifier: String,
}

impl CliContext {
    pub fn new(vault: PathBuf, markdown_identifier: Option<String>) -> anyhow::Result<Self> {
        if !vault.is_dir() {
            anyhow::bail!("Vault directory not found: {}", vault.display());
        }
        let settings = AppConfig::load();
        let markdown_identifier = markdown_identifier
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| settings.effective_markdown_identifier().to_string());
        tracing::debug!(
            "Using vault {} with board blocks marked '{}'",
            vault.display(),
            markdown_identifier
        );
        Ok(Self {
            vault: Arc::new(VaultStore::new(vault)),
            markdown_identifier,
        })
    }

    /// Raw board configuration from a JSON file, a markdown note or stdin.
    pub fn read_config(&self, source: &str) -> anyhow::Result<String> {
        if source == "-" {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read board configuration from stdin")?;
            return Ok(raw);
        }

        let path = Path::new(source);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board configuration {}", path.display()))?;
        if path.extension().is_some_and(|ext| ext == "md") {
            return first_board_block(&content, &self.markdown_identifier).ok_or_else(|| {
                anyhow::anyhow!(
                    "No '{}' code block found in {}",
                    self.markdown_identifier,
                    path.display()
                )
            });
        }
        Ok(content)
    }

    pub async fn open_session(
        &self,
        raw: &str,
        sync: SyncQueue,
    ) -> Result<BoardSession, ParseErrorView> {
        BoardSession::open(raw, self.vault.as_ref(), self.vault.clone(), sync).await
    }
}
