use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::content::slugify;
use crate::domain::{Author, AuthorInput};
use crate::error::DomainError;
use crate::ports::AuthorRepository;
use crate::services::publishing::non_blank;

/// Author profile management.
#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorRepository>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self { authors }
    }

    /// Register an author linked to the caller's account.
    pub async fn create(&self, user_id: Uuid, input: AuthorInput) -> Result<Author, DomainError> {
        let name = input.name.trim().to_string();
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(DomainError::InvalidInput(
                "author name must contain at least one letter or digit".to_string(),
            ));
        }

        if self.authors.find_by_slug(&slug).await?.is_some() {
            return Err(DomainError::Persistence(format!(
                "an author with slug '{slug}' already exists"
            )));
        }

        let author = Author {
            id: Uuid::new_v4(),
            user_id: Some(user_id),
            name,
            slug,
            bio: non_blank(input.bio),
            website_url: non_blank(input.website_url),
            twitter_username: non_blank(input.twitter_username),
            github_username: non_blank(input.github_username),
            linkedin_url: non_blank(input.linkedin_url),
            created_at: Utc::now(),
        };

        let saved = self.authors.insert(author).await?;
        tracing::info!(author_id = %saved.id, slug = %saved.slug, "Author created");
        Ok(saved)
    }

    /// All authors ordered by name.
    pub async fn list(&self) -> Result<Vec<Author>, DomainError> {
        Ok(self.authors.list().await?)
    }
}
