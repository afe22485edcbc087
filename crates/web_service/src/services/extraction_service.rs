//! Document ingestion: keep the upload, convert it, keep the markdown.
//!
//! One uploaded file in, one `<stem>.md` rendition out. A failed conversion
//! is that file's failure only; previously extracted documents stay in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};
use tokio::fs;

use docling_client::ExtractionClient;

use crate::error::{ApiError, Result};

#[derive(Debug)]
pub struct ExtractedDocument {
    pub filename: String,
    pub output_path: PathBuf,
    pub markdown: String,
}

pub struct ExtractionService {
    extraction_client: Arc<dyn ExtractionClient>,
    uploads_dir: PathBuf,
    extracted_dir: PathBuf,
}

impl ExtractionService {
    pub fn new(
        extraction_client: Arc<dyn ExtractionClient>,
        uploads_dir: PathBuf,
        extracted_dir: PathBuf,
    ) -> Self {
        Self {
            extraction_client,
            uploads_dir,
            extracted_dir,
        }
    }

    /// Store the uploaded bytes, convert them, store the markdown rendition.
    pub async fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedDocument> {
        let safe_name = sanitize_filename(filename)?;

        fs::create_dir_all(&self.uploads_dir).await?;
        let upload_path = self.uploads_dir.join(&safe_name);
        fs::write(&upload_path, bytes).await?;

        let markdown = self
            .extraction_client
            .convert(bytes, &safe_name)
            .await
            .map_err(|e| {
                error!("Extraction failed for {}: {}", safe_name, e);
                ApiError::from(e)
            })?;

        fs::create_dir_all(&self.extracted_dir).await?;
        let stem = Path::new(&safe_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&safe_name);
        let output_path = self.extracted_dir.join(format!("{}.md", stem));
        fs::write(&output_path, &markdown).await?;

        info!(
            "Extracted {} -> {} ({} markdown chars)",
            safe_name,
            output_path.display(),
            markdown.len()
        );

        Ok(ExtractedDocument {
            filename: safe_name,
            output_path,
            markdown,
        })
    }
}

/// Reduce a client-supplied filename to its final path component.
///
/// Uploads land inside the uploads dir no matter what the client names the
/// file; an empty or all-separators name is rejected.
fn sanitize_filename(filename: &str) -> Result<String> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_owned)
        .ok_or_else(|| ApiError::BadRequest("Uploaded file has no usable filename".to_string()))
}
