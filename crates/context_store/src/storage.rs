//! Context storage trait and the file-backed implementation

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

const CONTEXT_FILE: &str = "base_context.md";

/// Pluggable persistence for the single consolidated-context blob.
#[async_trait]
pub trait ContextStorage: Send + Sync {
    /// The stored text, or `None` if no consolidation has run.
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored text wholesale. Readers must observe either the
    /// previous text or the new one in full, never a mix.
    async fn store(&self, text: &str) -> Result<()>;

    /// Drop the stored text, returning the slot to the absent state.
    async fn clear(&self) -> Result<()>;
}

/// File-based context storage: one markdown file, replaced atomically.
#[derive(Clone)]
pub struct FileContextStorage {
    base_dir: PathBuf,
}

impl FileContextStorage {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the active context blob (useful for reporting).
    pub fn context_path(&self) -> PathBuf {
        self.base_dir.join(CONTEXT_FILE)
    }
}

#[async_trait]
impl ContextStorage for FileContextStorage {
    async fn load(&self) -> Result<Option<String>> {
        let path = self.context_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).await?;
        Ok(Some(text))
    }

    async fn store(&self, text: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;

        let path = self.context_path();
        let tmp = path.with_extension("md.tmp");
        fs::write(&tmp, text).await?;
        fs::rename(&tmp, &path).await?;

        tracing::info!(
            path = %path.display(),
            context_chars = text.len(),
            "consolidated context replaced"
        );

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let path = self.context_path();
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }
}
