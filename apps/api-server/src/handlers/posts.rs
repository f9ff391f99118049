//! Public blog reads and the owner's post management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use redator_shared::dto::{PostSummaryResponse, SavePostRequest, UserPostsResponse};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostSummaryResponse> = state
        .posts
        .list_published()
        .await?
        .into_iter()
        .map(views::post_summary)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{slug}
pub async fn get_published(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let published = state.posts.get_published(&slug).await?;
    Ok(HttpResponse::Ok().json(views::public_post(published)))
}

/// GET /api/admin/posts
pub async fn list_own(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_for_user(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(UserPostsResponse {
        published: posts.published.into_iter().map(views::post).collect(),
        drafts: posts.drafts.into_iter().map(views::post).collect(),
    }))
}

/// GET /api/admin/posts/{slug}
pub async fn get_own(
    identity: Identity,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_for_edit(identity.user_id, &slug).await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// POST /api/admin/posts
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<SavePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id, views::post_input(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(views::post(post)))
}

/// PUT /api/admin/posts/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<SavePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(
            identity.user_id,
            id.into_inner(),
            views::post_input(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(identity.user_id, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
