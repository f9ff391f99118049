use actix_web::{HttpResponse, web};

use redator_shared::dto::{AuthorResponse, CreateAuthorRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/authors
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors: Vec<AuthorResponse> = state
        .authors
        .list()
        .await?
        .into_iter()
        .map(views::author)
        .collect();
    Ok(HttpResponse::Ok().json(authors))
}

/// POST /api/admin/authors
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let author = state
        .authors
        .create(identity.user_id, views::author_input(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(views::author(author)))
}
