use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog article, either a draft or published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    /// Sanitized HTML body.
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

impl Post {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Publication timestamp to store for a save that sets `published`.
    ///
    /// Set on the false → true transition, kept while the post stays
    /// published, cleared when it is unpublished.
    pub fn resolve_published_at(
        previous: Option<&Post>,
        published: bool,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if !published {
            return None;
        }

        match previous {
            Some(prev) if prev.published => prev.published_at.or(Some(now)),
            _ => Some(now),
        }
    }
}

/// The mutable fields of a post as submitted by the editor.
///
/// Saves are full replacements: every field here overwrites the stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
}
