//! Article generation and rephrasing.

use actix_web::{HttpResponse, web};

use redator_shared::dto::{
    GenerateArticleRequest, GenerateArticleResponse, RephraseRequest, RephraseResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/ai/generate-article
///
/// Returns the model's raw HTML; callers sanitize before display.
pub async fn generate_article(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<GenerateArticleRequest>,
) -> AppResult<HttpResponse> {
    tracing::debug!(user_id = %identity.user_id, "Generating article");
    let content = state.generator.generate_article(&body.keyword).await?;
    Ok(HttpResponse::Ok().json(GenerateArticleResponse { content }))
}

/// POST /api/ai/rephrase
pub async fn rephrase(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<RephraseRequest>,
) -> AppResult<HttpResponse> {
    tracing::debug!(user_id = %identity.user_id, mode = %body.mode, "Rephrasing text");
    let result = state.rephraser.rephrase_named(&body.text, &body.mode).await?;
    Ok(HttpResponse::Ok().json(RephraseResponse { result }))
}
