use std::sync::Arc;

use actix_web::{http::header::ContentType, web, HttpResponse};
use tracing::debug;

use crate::error::SkillError;
use crate::provider::EmbeddingProvider;
use crate::skill;

/// Largest request body accepted, well above what an indexer sends per batch.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub struct AppState {
    pub provider: Arc<dyn EmbeddingProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

/// Register the skill routes. The Functions host forwards the `embeddings`
/// trigger to `/api/embeddings`; `/embeddings` serves direct callers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/embeddings", web::post().to(embeddings))
        .route("/api/embeddings", web::post().to(embeddings));
}

async fn embeddings(
    app: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, SkillError> {
    debug!(body = %String::from_utf8_lossy(&body), "received batch");
    let result = skill::handle(app.provider.as_ref(), &body).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(result))
}
