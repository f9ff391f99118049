use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use redator_core::domain::{Category, Post, PostLinks, Tag};
use redator_core::error::RepoError;
use redator_core::ports::{PostRepository, TaxonomyRepository};

#[derive(Default)]
struct Store {
    posts: HashMap<Uuid, Post>,
    links: HashMap<Uuid, PostLinks>,
}

impl Store {
    fn slug_taken(&self, post: &Post) -> bool {
        self.posts
            .values()
            .any(|p| p.slug == post.slug && p.id != post.id)
    }
}

/// Posts, their links, and a fixed taxonomy held in a HashMap.
///
/// Post and link writes happen under one write lock, so readers never see a
/// post without its links.
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::with_taxonomy(Vec::new(), Vec::new())
    }

    /// Seed the categories and tags posts can link to.
    pub fn with_taxonomy(categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            categories,
            tags,
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.posts.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .values()
            .find(|p| p.published && p.slug == slug)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.posts.values().filter(|p| p.published).cloned().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn create(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        if store.slug_taken(&post) {
            return Err(RepoError::Constraint(format!("slug '{}' already exists", post.slug)));
        }

        store.links.insert(post.id, links.clone());
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if !store.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if store.slug_taken(&post) {
            return Err(RepoError::Constraint(format!("slug '{}' already exists", post.slug)));
        }

        store.links.insert(post.id, links.clone());
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.links.remove(&id);
        store.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryPostRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags = self.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn categories_for_post(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let store = self.store.read().await;
        let Some(links) = store.links.get(&post_id) else {
            return Ok(Vec::new());
        };
        Ok(self
            .categories
            .iter()
            .filter(|c| links.category_ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let store = self.store.read().await;
        let Some(links) = store.links.get(&post_id) else {
            return Ok(Vec::new());
        };
        Ok(self
            .tags
            .iter()
            .filter(|t| links.tag_ids.contains(&t.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn post(slug: &str, published: bool) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: slug.to_string(),
            slug: slug.to_string(),
            content: "<p>x</p>".to_string(),
            summary: "x".to_string(),
            published,
            published_at: published.then_some(now),
            meta_title: None,
            meta_description: None,
            og_image: None,
            canonical_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_constraint_violation() {
        let repo = InMemoryPostRepository::new();
        repo.create(post("receitas", false), &PostLinks::default())
            .await
            .unwrap();

        let err = repo
            .create(post("receitas", false), &PostLinks::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn drafts_are_not_found_by_published_lookup() {
        let repo = InMemoryPostRepository::new();
        repo.create(post("rascunho", false), &PostLinks::default())
            .await
            .unwrap();

        assert!(repo.find_by_slug("rascunho").await.unwrap().is_some());
        assert!(repo.find_published_by_slug("rascunho").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn published_posts_are_listed_newest_first() {
        let repo = InMemoryPostRepository::new();
        let mut older = post("antigo", true);
        older.published_at = Some(Utc::now() - Duration::days(3));
        repo.create(older, &PostLinks::default()).await.unwrap();
        repo.create(post("novo", true), &PostLinks::default())
            .await
            .unwrap();
        repo.create(post("oculto", false), &PostLinks::default())
            .await
            .unwrap();

        let slugs: Vec<String> = repo
            .list_published()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, ["novo", "antigo"]);
    }

    #[tokio::test]
    async fn links_follow_the_post() {
        let culinaria = Category {
            id: Uuid::new_v4(),
            name: "Culinária".into(),
            slug: "culinaria".into(),
        };
        let vegano = Tag {
            id: Uuid::new_v4(),
            name: "Vegano".into(),
            slug: "vegano".into(),
        };
        let repo = InMemoryPostRepository::with_taxonomy(vec![culinaria.clone()], vec![vegano.clone()]);
        let p = post("receitas", true);
        let links = PostLinks {
            category_ids: vec![culinaria.id],
            tag_ids: vec![vegano.id],
        };
        repo.create(p.clone(), &links).await.unwrap();

        assert_eq!(repo.categories_for_post(p.id).await.unwrap(), vec![culinaria]);
        assert_eq!(repo.tags_for_post(p.id).await.unwrap(), vec![vegano]);

        repo.update(p.clone(), &PostLinks::default()).await.unwrap();
        assert!(repo.categories_for_post(p.id).await.unwrap().is_empty());

        repo.delete(p.id).await.unwrap();
        assert!(matches!(repo.delete(p.id).await, Err(RepoError::NotFound)));
        assert!(repo.tags_for_post(p.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_post_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let err = repo
            .update(post("nada", false), &PostLinks::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
