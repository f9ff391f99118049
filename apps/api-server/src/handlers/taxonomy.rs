use actix_web::{HttpResponse, web};

use redator_core::DomainError;
use redator_shared::dto::TaxonomyResponse;

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<TaxonomyResponse> = state
        .taxonomy
        .list_categories()
        .await
        .map_err(DomainError::from)?
        .into_iter()
        .map(views::category)
        .collect();
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /api/tags
pub async fn tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags: Vec<TaxonomyResponse> = state
        .taxonomy
        .list_tags()
        .await
        .map_err(DomainError::from)?
        .into_iter()
        .map(views::tag)
        .collect();
    Ok(HttpResponse::Ok().json(tags))
}
