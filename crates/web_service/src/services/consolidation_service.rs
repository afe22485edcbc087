//! Corpus consolidation: extracted documents in, one reference text out.
//!
//! Every `*.md` under the extracted-docs dir is concatenated with START/END
//! markers, summarized by the generation collaborator, and installed as the
//! new active context. The replacement is wholesale; the previous context
//! stays active until the new one is durably stored.

use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info};
use tokio::fs;

use context_store::{ContextStorage, ContextStore};
use gemini_client::GenerationClient;

use crate::error::{ApiError, Result};

/// Cap on the `content_preview` field of the consolidation response.
const PREVIEW_CHARS: usize = 500;

#[derive(Debug)]
pub struct ConsolidationOutcome {
    pub file: PathBuf,
    pub preview: String,
}

pub struct ConsolidationService<C: ContextStorage> {
    context_store: Arc<ContextStore<C>>,
    generation_client: Arc<dyn GenerationClient>,
    extracted_dir: PathBuf,
    context_file: PathBuf,
}

impl<C: ContextStorage> ConsolidationService<C> {
    pub fn new(
        context_store: Arc<ContextStore<C>>,
        generation_client: Arc<dyn GenerationClient>,
        extracted_dir: PathBuf,
        context_file: PathBuf,
    ) -> Self {
        Self {
            context_store,
            generation_client,
            extracted_dir,
            context_file,
        }
    }

    /// Consolidate every extracted document into a fresh active context.
    pub async fn consolidate(&self) -> Result<ConsolidationOutcome> {
        let combined = self.combine_extracted().await?;

        let summary = self
            .generation_client
            .summarize(&combined)
            .await
            .map_err(|e| {
                error!("Consolidation summary failed: {}", e);
                ApiError::from(e)
            })?;

        self.context_store.set_active_context(&summary).await?;

        info!(
            "Consolidation complete: {} chars stored at {}",
            summary.len(),
            self.context_file.display()
        );

        Ok(ConsolidationOutcome {
            file: self.context_file.clone(),
            preview: truncate_chars(&summary, PREVIEW_CHARS),
        })
    }

    /// Concatenate all extracted markdown files, each wrapped in the
    /// file-boundary markers the summarization prompt expects.
    async fn combine_extracted(&self) -> Result<String> {
        let mut names = Vec::new();

        let mut entries = match fs::read_dir(&self.extracted_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::NoDocuments);
            }
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
                names.push(path);
            }
        }
        if names.is_empty() {
            return Err(ApiError::NoDocuments);
        }

        // Directory iteration order is platform-dependent; sort for a
        // reproducible combined document.
        names.sort();

        let mut combined = String::new();
        for path in &names {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let content = fs::read_to_string(path).await?;
            combined.push_str(&format!("\n\n--- START OF FILE: {} ---\n\n", name));
            combined.push_str(&content);
            combined.push_str(&format!("\n\n--- END OF FILE: {} ---\n\n", name));
        }

        Ok(combined)
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
