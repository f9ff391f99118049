use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use redator_core::domain::Author;
use redator_core::error::RepoError;
use redator_core::ports::{AuthorRepository, BaseRepository};

/// Authors held in a HashMap keyed by id.
pub struct InMemoryAuthorRepository {
    store: RwLock<HashMap<Uuid, Author>>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAuthorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Author, Uuid> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, author: Author) -> Result<Author, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|a| a.slug == author.slug) {
            return Err(RepoError::Constraint(format!(
                "author slug '{}' already exists",
                author.slug
            )));
        }
        store.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, author: Author) -> Result<Author, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&author.id) {
            Some(existing) => {
                *existing = author.clone();
                Ok(author)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn list(&self) -> Result<Vec<Author>, RepoError> {
        let store = self.store.read().await;
        let mut authors: Vec<Author> = store.values().cloned().collect();
        authors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(authors)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Author>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|a| a.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use redator_core::DomainError;
    use redator_core::domain::AuthorInput;
    use redator_core::services::AuthorService;

    use super::*;

    fn input(name: &str) -> AuthorInput {
        AuthorInput {
            name: name.to_string(),
            bio: Some("  ".to_string()),
            twitter_username: Some("redator".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn service_creates_authors_with_slugs() {
        let service = AuthorService::new(Arc::new(InMemoryAuthorRepository::new()));
        let user = Uuid::new_v4();

        let author = service.create(user, input("José da Silva")).await.unwrap();

        assert_eq!(author.slug, "jose-da-silva");
        assert_eq!(author.user_id, Some(user));
        assert_eq!(author.bio, None);
        assert_eq!(author.twitter_username.as_deref(), Some("redator"));
    }

    #[tokio::test]
    async fn duplicate_author_names_are_rejected() {
        let service = AuthorService::new(Arc::new(InMemoryAuthorRepository::new()));
        service.create(Uuid::new_v4(), input("Ana")).await.unwrap();

        let err = service.create(Uuid::new_v4(), input("ana")).await.unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[tokio::test]
    async fn nameless_author_is_invalid() {
        let service = AuthorService::new(Arc::new(InMemoryAuthorRepository::new()));
        let err = service.create(Uuid::new_v4(), input("  ")).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn authors_are_listed_by_name() {
        let service = AuthorService::new(Arc::new(InMemoryAuthorRepository::new()));
        for name in ["Carla", "Ana", "Bruno"] {
            service.create(Uuid::new_v4(), input(name)).await.unwrap();
        }

        let names: Vec<String> = service.list().await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["Ana", "Bruno", "Carla"]);
    }
}
