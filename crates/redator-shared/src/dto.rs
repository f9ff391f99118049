//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /api/ai/generate-article`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateArticleRequest {
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateArticleResponse {
    pub content: String,
}

/// `POST /api/ai/rephrase`. `type` is one of `rephrase`, `simplify`,
/// `expand`, `summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RephraseRequest {
    pub text: String,
    #[serde(rename = "type")]
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RephraseResponse {
    pub result: String,
}

/// Full content of a post as submitted by the editor. Updates replace every
/// field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// A stored post as seen by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller's posts, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPostsResponse {
    pub published: Vec<PostResponse>,
    pub drafts: Vec<PostResponse>,
}

/// One entry of the public post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub published_at: Option<DateTime<Utc>>,
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Page metadata with fallbacks already applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
}

/// A published post ready to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicPostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub published_at: Option<DateTime<Utc>>,
    pub categories: Vec<TaxonomyResponse>,
    pub tags: Vec<TaxonomyResponse>,
    pub seo: SeoMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub linkedin_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/editor/sessions`. With `slug`, the session edits that
/// existing post; without, it starts empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub slug: Option<String>,
}

/// Character span of the document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDto {
    pub start: usize,
    pub end: usize,
}

/// `POST /api/editor/sessions/{id}/commands`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorCommandRequest {
    Generate { keyword: String },
    Edit { document: SavePostRequest },
    Rephrase { selection: SelectionDto, mode: String },
    Save,
    Acknowledge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    pub keyword: String,
    pub sanitized_content: String,
}

/// Snapshot of an editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSessionResponse {
    pub id: Uuid,
    /// One of `empty`, `generating`, `draft`, `editing`, `rephrasing`,
    /// `saving`, `saved`, `failed`.
    pub state: String,
    pub post_id: Option<Uuid>,
    pub draft: Option<DraftResponse>,
    pub document: SavePostRequest,
    pub error: Option<String>,
}
