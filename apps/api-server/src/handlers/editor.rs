//! Editing sessions over HTTP.
//!
//! A failed command answers with its error; the session keeps the failure
//! (state and message) for the next read.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use redator_core::DomainError;
use redator_core::domain::PostLinks;
use redator_core::services::{EditorCommand, EditorSession, RephraseMode, Selection};
use redator_shared::dto::{EditorCommandRequest, OpenSessionRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::middleware::rate_limit::admit;
use crate::sessions::snapshot;
use crate::state::AppState;

/// POST /api/editor/sessions
///
/// Opens a blank session, or one over an existing post when `slug` is given.
pub async fn open(
    identity: Identity,
    state: web::Data<AppState>,
    body: Option<web::Json<OpenSessionRequest>>,
) -> AppResult<HttpResponse> {
    let slug = body.and_then(|b| b.into_inner().slug);

    let session = match slug {
        Some(slug) => {
            let post = state.posts.get_for_edit(identity.user_id, &slug).await?;
            let links = PostLinks {
                category_ids: ids(state.taxonomy.categories_for_post(post.id).await, |c| c.id)?,
                tag_ids: ids(state.taxonomy.tags_for_post(post.id).await, |t| t.id)?,
            };
            EditorSession::for_post(identity.user_id, &post, links)
        }
        None => EditorSession::new(identity.user_id),
    };

    let handle = state.sessions.open(session).await;
    Ok(HttpResponse::Created().json(views::editor_session(&snapshot(&handle))))
}

/// GET /api/editor/sessions/{id}
pub async fn get(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let handle = state.sessions.get(id.into_inner(), identity.user_id).await?;
    Ok(HttpResponse::Ok().json(views::editor_session(&snapshot(&handle))))
}

/// POST /api/editor/sessions/{id}/commands
///
/// Generate and rephrase count against the same quota as `/api/ai`.
pub async fn command(
    req: HttpRequest,
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<EditorCommandRequest>,
) -> AppResult<HttpResponse> {
    let handle = state.sessions.get(id.into_inner(), identity.user_id).await?;
    let command = editor_command(body.into_inner())?;

    if matches!(
        command,
        EditorCommand::Generate { .. } | EditorCommand::Rephrase { .. }
    ) {
        admit(&req).await?;
    }

    state.editor.dispatch(&handle, command).await?;
    Ok(HttpResponse::Ok().json(views::editor_session(&snapshot(&handle))))
}

/// DELETE /api/editor/sessions/{id}
pub async fn close(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.sessions.close(id.into_inner(), identity.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn editor_command(req: EditorCommandRequest) -> Result<EditorCommand, DomainError> {
    Ok(match req {
        EditorCommandRequest::Generate { keyword } => EditorCommand::Generate { keyword },
        EditorCommandRequest::Edit { document } => EditorCommand::Edit {
            document: views::post_input(document),
        },
        EditorCommandRequest::Rephrase { selection, mode } => EditorCommand::Rephrase {
            selection: Selection {
                start: selection.start,
                end: selection.end,
            },
            mode: mode.parse::<RephraseMode>()?,
        },
        EditorCommandRequest::Save => EditorCommand::Save,
        EditorCommandRequest::Acknowledge => EditorCommand::Acknowledge,
    })
}

fn ids<T>(
    rows: Result<Vec<T>, redator_core::error::RepoError>,
    id: impl Fn(&T) -> Uuid,
) -> Result<Vec<Uuid>, DomainError> {
    Ok(rows?.iter().map(id).collect())
}
