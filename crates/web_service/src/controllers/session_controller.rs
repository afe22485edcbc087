use actix_web::{
    web::{self, Data, Path},
    HttpResponse,
};
use log::{error, info};
use session_store::SessionError;

use crate::controllers::parse_session_id;
use crate::dto::CreateSessionResponse;
use crate::error::{ApiError, Result};
use crate::server::AppState;

/// POST /sessions/
/// Create a new empty chat session.
pub async fn create_session(state: Data<AppState>) -> Result<HttpResponse> {
    let session = state.session_store.create_session().await.map_err(|e| {
        error!("Failed to create session: {}", e);
        ApiError::from(e)
    })?;
    info!("Created session {}", session.id);
    Ok(HttpResponse::Ok().json(CreateSessionResponse {
        session_id: session.id,
    }))
}

/// GET /sessions/
/// List all sessions, newest first.
pub async fn list_sessions(state: Data<AppState>) -> Result<HttpResponse> {
    let summaries = state.session_store.list_sessions().await.map_err(|e| {
        error!("Failed to list sessions: {}", e);
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /sessions/{session_id}
/// Full record for one session, messages included.
pub async fn get_session(path: Path<String>, state: Data<AppState>) -> Result<HttpResponse> {
    let session_id = parse_session_id(&path.into_inner())?;
    let session = match state.session_store.get_session(session_id).await {
        Ok(session) => session,
        // An unknown id is expected traffic, not a failure worth logging.
        Err(SessionError::NotFound) => return Err(ApiError::SessionNotFound),
        Err(e) => {
            error!("Failed to read session {}: {}", session_id, e);
            return Err(e.into());
        }
    };
    Ok(HttpResponse::Ok().json(session))
}

/// Configure routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .route("/", web::post().to(create_session))
            .route("/", web::get().to(list_sessions))
            .route("/{session_id}", web::get().to(get_session)),
    );
}
