//! docling-serve `convert/source` wire types.
//!
//! The file payload travels as a base64 string; the response carries the
//! converted document per requested output format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ConvertRequest {
    pub options: ConvertOptions,
    pub sources: Vec<FileSource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertOptions {
    pub to_formats: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            to_formats: vec!["md".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSource {
    pub kind: String,
    pub base64_string: String,
    pub filename: String,
}

impl FileSource {
    pub fn new(base64_string: String, filename: impl Into<String>) -> Self {
        Self {
            kind: "file".to_string(),
            base64_string,
            filename: filename.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertResponse {
    #[serde(default)]
    pub document: Option<ConvertedDocument>,
    pub status: String,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertedDocument {
    #[serde(default)]
    pub md_content: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}
