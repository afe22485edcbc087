use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{info, warn};

use chat_core::ServiceConfig;
use context_store::{ContextStore, FileContextStorage};
use docling_client::{DoclingClient, ExtractionClient};
use gemini_client::{GeminiClient, GenerationClient};
use session_store::{FileSessionStorage, SessionStore};

use crate::controllers::{
    chat_controller, document_controller, session_controller, system_controller,
};
use crate::services::{ConsolidationService, ExtractionService};

const DEFAULT_WORKER_COUNT: usize = 4;

/// Shared state handed to every request handler.
///
/// Stores and collaborator clients are built once at startup; handlers only
/// clone `Arc`s out of this.
pub struct AppState {
    pub session_store: Arc<SessionStore<FileSessionStorage>>,
    pub context_store: Arc<ContextStore<FileContextStorage>>,
    pub generation_client: Arc<dyn GenerationClient>,
    pub extraction_service: Arc<ExtractionService>,
    pub consolidation_service: Arc<ConsolidationService<FileContextStorage>>,
}

impl AppState {
    /// Wire stores and services for the given data layout and collaborators.
    pub fn new(
        config: &ServiceConfig,
        generation_client: Arc<dyn GenerationClient>,
        extraction_client: Arc<dyn ExtractionClient>,
    ) -> Self {
        let session_store = Arc::new(SessionStore::new(FileSessionStorage::new(
            config.sessions_dir(),
        )));

        let context_storage = FileContextStorage::new(config.consolidated_dir());
        let context_file = context_storage.context_path();
        let context_store = Arc::new(ContextStore::new(context_storage));

        let extraction_service = Arc::new(ExtractionService::new(
            extraction_client,
            config.uploads_dir(),
            config.extracted_dir(),
        ));
        let consolidation_service = Arc::new(ConsolidationService::new(
            context_store.clone(),
            generation_client.clone(),
            config.extracted_dir(),
            context_file,
        ));

        Self {
            session_store,
            context_store,
            generation_client,
            extraction_service,
            consolidation_service,
        }
    }
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    session_controller::config(cfg);
    chat_controller::config(cfg);
    document_controller::config(cfg);
    system_controller::config(cfg);
}

/// Build the collaborator clients from configuration and run the server
/// until it is shut down.
pub async fn run(config: ServiceConfig) -> std::io::Result<()> {
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; chat and consolidation requests will fail");
    }

    let mut gemini =
        GeminiClient::new(config.gemini_api_key.clone().unwrap_or_default())
            .with_model(config.gemini_model.clone());
    if let Some(base) = &config.gemini_api_base {
        gemini = gemini.with_base_url(base.clone());
    }
    let generation_client: Arc<dyn GenerationClient> = Arc::new(gemini);

    let extraction_client: Arc<dyn ExtractionClient> =
        Arc::new(DoclingClient::new(config.docling_base_url.clone()));

    let app_state = web::Data::new(AppState::new(&config, generation_client, extraction_client));
    let port = config.port;

    info!(
        "Starting docuchat server on http://0.0.0.0:{} (data dir: {})",
        port,
        config.data_dir.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
