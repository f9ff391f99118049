//! Post persistence: slugs, summaries, ownership, publication state.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::content::{sanitize, slugify, summarize};
use crate::domain::{Category, Post, PostInput, PostLinks, Tag};
use crate::error::DomainError;
use crate::ports::{PostRepository, TaxonomyRepository};

const MAX_SLUG_ATTEMPTS: u32 = 50;

/// A user's posts split by publication state, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct UserPosts {
    pub published: Vec<Post>,
    pub drafts: Vec<Post>,
}

/// A published post ready for public rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPost {
    /// The post with its content re-sanitized at render time.
    pub post: Post,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// Creates, updates, deletes, and reads posts on behalf of a user.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    taxonomy: Arc<dyn TaxonomyRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, taxonomy: Arc<dyn TaxonomyRepository>) -> Self {
        Self { posts, taxonomy }
    }

    /// Store a new post owned by `user_id`.
    pub async fn create(&self, user_id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let title = validated_title(&input)?;
        let slug = self.unique_slug(&slugify(&title), None).await?;
        let now = Utc::now();

        let content = sanitize(&input.content).into_string();
        let summary = summarize(&content);
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            meta_title: Some(title.clone()),
            meta_description: Some(summary.clone()),
            title,
            slug,
            content,
            summary,
            published: input.published,
            published_at: Post::resolve_published_at(None, input.published, now),
            og_image: non_blank(input.og_image),
            canonical_url: non_blank(input.canonical_url),
            created_at: now,
            updated_at: now,
        };
        let links = PostLinks {
            category_ids: input.category_ids,
            tag_ids: input.tag_ids,
        };

        let saved = self.posts.create(post, &links).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, published = saved.published, "Post created");
        Ok(saved)
    }

    /// Replace every mutable field of an existing post.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let existing = self.owned(user_id, id).await?;
        let title = validated_title(&input)?;
        let slug = self.unique_slug(&slugify(&title), Some(id)).await?;
        let now = Utc::now();

        let content = sanitize(&input.content).into_string();
        let summary = summarize(&content);
        let post = Post {
            id,
            user_id: existing.user_id,
            meta_title: Some(title.clone()),
            meta_description: Some(summary.clone()),
            title,
            slug,
            content,
            summary,
            published: input.published,
            published_at: Post::resolve_published_at(Some(&existing), input.published, now),
            og_image: non_blank(input.og_image),
            canonical_url: non_blank(input.canonical_url),
            created_at: existing.created_at,
            updated_at: now,
        };
        let links = PostLinks {
            category_ids: input.category_ids,
            tag_ids: input.tag_ids,
        };

        let saved = self.posts.update(post, &links).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, published = saved.published, "Post updated");
        Ok(saved)
    }

    /// Hard-delete a post. There is no undo.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.owned(user_id, id).await?;
        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Load one of the caller's posts, published or not, for editing.
    pub async fn get_for_edit(&self, user_id: Uuid, slug: &str) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("post", slug))?;

        if !post.is_owned_by(user_id) {
            return Err(DomainError::Authorization);
        }
        Ok(post)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<UserPosts, DomainError> {
        let (published, drafts) = self
            .posts
            .find_by_user_id(user_id)
            .await?
            .into_iter()
            .partition(|p| p.published);

        Ok(UserPosts { published, drafts })
    }

    pub async fn list_published(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_published().await?)
    }

    /// A published post by slug, sanitized again for rendering.
    pub async fn get_published(&self, slug: &str) -> Result<PublishedPost, DomainError> {
        let mut post = self
            .posts
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("post", slug))?;

        post.content = sanitize(&post.content).into_string();
        let categories = self.taxonomy.categories_for_post(post.id).await?;
        let tags = self.taxonomy.tags_for_post(post.id).await?;

        Ok(PublishedPost {
            post,
            categories,
            tags,
        })
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;

        if !post.is_owned_by(user_id) {
            tracing::warn!(post_id = %id, user_id = %user_id, "Rejected write to a post owned by another user");
            return Err(DomainError::Authorization);
        }
        Ok(post)
    }

    /// First free slug among `base`, `base-2`, `base-3`, ...
    ///
    /// A post never collides with itself, so an update that keeps its title
    /// keeps its slug.
    async fn unique_slug(&self, base: &str, own_id: Option<Uuid>) -> Result<String, DomainError> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 1 {
                base.to_string()
            } else {
                format!("{base}-{attempt}")
            };

            match self.posts.find_by_slug(&candidate).await? {
                Some(other) if Some(other.id) != own_id => continue,
                _ => return Ok(candidate),
            }
        }

        Err(DomainError::Persistence(format!(
            "no free slug for '{base}' after {MAX_SLUG_ATTEMPTS} attempts"
        )))
    }
}

fn validated_title(input: &PostInput) -> Result<String, DomainError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(DomainError::InvalidInput("title must not be empty".to_string()));
    }
    if slugify(title).is_empty() {
        return Err(DomainError::InvalidInput(
            "title must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(title.to_string())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MemoryStore;

    fn service() -> (PostService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (PostService::new(store.clone(), store.clone()), store)
    }

    fn input(title: &str, content: &str, published: bool) -> PostInput {
        PostInput {
            title: title.to_string(),
            content: content.to_string(),
            published,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_derives_slug_summary_and_meta() {
        let (service, _) = service();
        let user = Uuid::new_v4();

        let post = service
            .create(user, input("Café com Leite!", "<h1>Café</h1><p>Com leite.</p>", false))
            .await
            .unwrap();

        assert_eq!(post.slug, "cafe-com-leite");
        assert_eq!(post.summary, "Café Com leite.");
        assert_eq!(post.meta_title.as_deref(), Some("Café com Leite!"));
        assert_eq!(post.meta_description.as_deref(), Some("Café Com leite."));
        assert_eq!(post.user_id, user);
        assert!(!post.published);
        assert_eq!(post.published_at, None);
    }

    #[tokio::test]
    async fn create_sanitizes_content() {
        let (service, _) = service();

        let post = service
            .create(
                Uuid::new_v4(),
                input("Seguro", r#"<p onclick="x()">Oi<script>bad()</script></p>"#, false),
            )
            .await
            .unwrap();

        assert_eq!(post.content, "<p>Oi</p>");
    }

    #[tokio::test]
    async fn publishing_sets_published_at() {
        let (service, _) = service();
        let post = service
            .create(Uuid::new_v4(), input("Publicado", "<p>x</p>", true))
            .await
            .unwrap();

        assert!(post.published);
        assert!(post.published_at.is_some());
    }

    #[tokio::test]
    async fn colliding_titles_get_numbered_slugs() {
        let (service, _) = service();
        let user = Uuid::new_v4();

        let a = service.create(user, input("Receitas", "<p>a</p>", false)).await.unwrap();
        let b = service.create(user, input("Receitas", "<p>b</p>", false)).await.unwrap();
        let c = service.create(user, input("Receitas!", "<p>c</p>", false)).await.unwrap();

        assert_eq!(a.slug, "receitas");
        assert_eq!(b.slug, "receitas-2");
        assert_eq!(c.slug, "receitas-3");
    }

    #[tokio::test]
    async fn update_keeps_own_slug_and_publication_time() {
        let (service, _) = service();
        let user = Uuid::new_v4();
        let created = service.create(user, input("Receitas", "<p>a</p>", true)).await.unwrap();

        let updated = service
            .update(user, created.id, input("Receitas", "<p>novo</p>", true))
            .await
            .unwrap();

        assert_eq!(updated.slug, "receitas");
        assert_eq!(updated.published_at, created.published_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.content, "<p>novo</p>");
    }

    #[tokio::test]
    async fn unpublishing_clears_published_at() {
        let (service, _) = service();
        let user = Uuid::new_v4();
        let created = service.create(user, input("Receitas", "<p>a</p>", true)).await.unwrap();

        let updated = service
            .update(user, created.id, input("Receitas", "<p>a</p>", false))
            .await
            .unwrap();

        assert_eq!(updated.published_at, None);
    }

    #[tokio::test]
    async fn writes_by_other_users_are_rejected() {
        let (service, store) = service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let post = service.create(owner, input("Meu post", "<p>a</p>", false)).await.unwrap();

        let err = service
            .update(intruder, post.id, input("Roubado", "<p>b</p>", false))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization));

        let err = service.delete(intruder, post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Authorization));

        assert_eq!(store.updates(), 0);
        assert!(store.get(post.id).is_some());
    }

    #[tokio::test]
    async fn delete_is_hard() {
        let (service, store) = service();
        let user = Uuid::new_v4();
        let post = service.create(user, input("Some", "<p>a</p>", false)).await.unwrap();

        service.delete(user, post.id).await.unwrap();

        assert!(store.get(post.id).is_none());
        let err = service.delete(user, post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn blank_or_symbol_only_titles_are_invalid() {
        let (service, store) = service();

        for title in ["", "   ", "!!!"] {
            let err = service
                .create(Uuid::new_v4(), input(title, "<p>a</p>", false))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_public_reads() {
        let (service, _) = service();
        let user = Uuid::new_v4();
        service.create(user, input("Rascunho", "<p>a</p>", false)).await.unwrap();
        service.create(user, input("Público", "<p>b</p>", true)).await.unwrap();

        let err = service.get_published("rascunho").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let public = service.get_published("publico").await.unwrap();
        assert_eq!(public.post.title, "Público");

        let listed = service.list_published().await.unwrap();
        assert_eq!(listed.len(), 1);

        let mine = service.list_for_user(user).await.unwrap();
        assert_eq!(mine.published.len(), 1);
        assert_eq!(mine.drafts.len(), 1);
    }

    #[tokio::test]
    async fn public_read_resanitizes_stored_content() {
        let (service, store) = service();
        let user = Uuid::new_v4();
        let post = service.create(user, input("Antigo", "<p>a</p>", true)).await.unwrap();
        store.overwrite_content(post.id, "<p>ok</p><iframe src=\"https://x\"></iframe>");

        let public = service.get_published("antigo").await.unwrap();
        assert_eq!(public.post.content, "<p>ok</p>");
    }

    #[tokio::test]
    async fn get_for_edit_requires_ownership() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        service.create(owner, input("Meu", "<p>a</p>", false)).await.unwrap();

        assert!(service.get_for_edit(owner, "meu").await.is_ok());
        let err = service.get_for_edit(Uuid::new_v4(), "meu").await.unwrap_err();
        assert!(matches!(err, DomainError::Authorization));
    }
}
