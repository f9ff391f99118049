use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post category. Posts and categories are many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A post tag. Posts and tags are many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Category and tag associations written together with a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLinks {
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
}
