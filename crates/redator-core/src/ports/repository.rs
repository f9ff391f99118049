use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, Category, Post, PostLinks, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post storage.
///
/// Writes carry the post's category and tag links and must apply them in the
/// same atomic operation as the row itself.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Any post with this slug, published or not.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// A published post with this slug; drafts are invisible here.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Posts owned by `user_id`, newest first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Published posts, most recently published first.
    async fn list_published(&self) -> Result<Vec<Post>, RepoError>;

    async fn create(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError>;

    /// Full replacement of the stored row and its links.
    async fn update(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError>;

    /// Hard delete, links included.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    /// All authors ordered by name.
    async fn list(&self) -> Result<Vec<Author>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Author>, RepoError>;
}

/// Read access to categories, tags, and their association with posts.
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, RepoError>;

    async fn categories_for_post(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError>;

    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;
}
