use actix_web::{
    web::{self, Data, Json, Path},
    HttpResponse,
};

use crate::controllers::parse_session_id;
use crate::dto::{ChatRequest, ChatResponse};
use crate::error::Result;
use crate::server::AppState;
use crate::services::ChatService;

/// POST /chat/{session_id}
/// Run one conversation turn against the consolidated context.
pub async fn chat(
    path: Path<String>,
    request: Json<ChatRequest>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let session_id = parse_session_id(&path.into_inner())?;

    let service = ChatService::new(
        state.session_store.clone(),
        state.context_store.clone(),
        state.generation_client.clone(),
    );
    let response = service
        .respond(session_id, &request.prompt, request.temperature)
        .await?;

    Ok(HttpResponse::Ok().json(ChatResponse { response }))
}

/// Configure routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/chat").route("/{session_id}", web::post().to(chat)));
}
