use actix_multipart::Multipart;
use actix_web::{
    web::{self, Data},
    HttpResponse,
};
use futures_util::TryStreamExt;

use crate::dto::{ConsolidateResponse, ExtractResponse};
use crate::error::{ApiError, Result};
use crate::server::AppState;

/// POST /extract/
/// Accept one uploaded file, convert it, and store the markdown rendition.
pub async fn extract(mut payload: Multipart, state: Data<AppState>) -> Result<HttpResponse> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart payload: {}", e)))?
    {
        if field.name() != "file" {
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_owned)
            .ok_or_else(|| {
                ApiError::BadRequest("Uploaded file part has no filename".to_string())
            })?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?
        {
            bytes.extend_from_slice(&chunk);
        }

        let document = state.extraction_service.extract(&filename, &bytes).await?;

        return Ok(HttpResponse::Ok().json(ExtractResponse {
            filename: document.filename,
            status: "success".to_string(),
            extracted_file: document.output_path.display().to_string(),
            extracted_content: document.markdown,
        }));
    }

    Err(ApiError::BadRequest(
        "No file part in multipart payload".to_string(),
    ))
}

/// POST /consolidate/
/// Summarize every extracted document into the active context.
pub async fn consolidate(state: Data<AppState>) -> Result<HttpResponse> {
    let outcome = state.consolidation_service.consolidate().await?;

    Ok(HttpResponse::Ok().json(ConsolidateResponse {
        status: "success".to_string(),
        message: "Consolidation complete.".to_string(),
        file: outcome.file.display().to_string(),
        content_preview: outcome.preview,
    }))
}

/// Configure routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/extract/", web::post().to(extract))
        .route("/consolidate/", web::post().to(consolidate));
}
