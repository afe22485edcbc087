pub mod chat_service;
pub mod consolidation_service;
pub mod extraction_service;

pub use chat_service::ChatService;
pub use consolidation_service::{ConsolidationOutcome, ConsolidationService};
pub use extraction_service::{ExtractedDocument, ExtractionService};
