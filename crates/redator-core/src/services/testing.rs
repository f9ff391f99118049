//! Test doubles for the service layer.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, PostLinks, Tag};
use crate::error::RepoError;
use crate::ports::{
    CompletionRequest, PostRepository, TaxonomyRepository, TextGenerationClient,
    TextGenerationError,
};

/// Text generation client answering from a script and recording requests.
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, TextGenerationError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    /// Always answer with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail the first call with `error`.
    pub fn failing(error: TextGenerationError) -> Self {
        Self::sequence(vec![Err(error)])
    }

    /// Answer calls in order; calls past the end fail.
    pub fn sequence(replies: Vec<Result<String, TextGenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerationClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, TextGenerationError> {
        self.requests.lock().unwrap().push(request);
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        self.fallback
            .clone()
            .ok_or_else(|| TextGenerationError::Api("script exhausted".into()))
    }
}

/// Text generation client that never answers.
pub(crate) struct SilentClient;

#[async_trait]
impl TextGenerationClient for SilentClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, TextGenerationError> {
        std::future::pending().await
    }
}

/// Post and taxonomy storage in a HashMap, with write counters and an
/// injectable write failure.
pub(crate) struct MemoryStore {
    posts: Mutex<HashMap<Uuid, Post>>,
    links: Mutex<HashMap<Uuid, PostLinks>>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    creates: AtomicUsize,
    updates: AtomicUsize,
    reject_writes: AtomicBool,
    hold_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(HashMap::new()),
            links: Mutex::new(HashMap::new()),
            categories: vec![Category {
                id: Uuid::new_v4(),
                name: "Culinária".into(),
                slug: "culinaria".into(),
            }],
            tags: vec![Tag {
                id: Uuid::new_v4(),
                name: "Vegano".into(),
                slug: "vegano".into(),
            }],
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            reject_writes: AtomicBool::new(false),
            hold_writes: AtomicBool::new(false),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Make writes wait forever.
    pub fn hold_writes(&self, hold: bool) {
        self.hold_writes.store(hold, Ordering::SeqCst);
    }

    async fn wait_if_held(&self) {
        if self.hold_writes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    pub fn only_post(&self) -> Post {
        let posts = self.posts.lock().unwrap();
        assert_eq!(posts.len(), 1, "expected exactly one stored post");
        posts.values().next().cloned().unwrap()
    }

    /// Bypass the service to simulate content stored under older rules.
    pub fn overwrite_content(&self, id: Uuid, content: &str) {
        if let Some(post) = self.posts.lock().unwrap().get_mut(&id) {
            post.content = content.to_string();
        }
    }

    fn write(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Query("write rejected".into()));
        }
        let mut posts = self.posts.lock().unwrap();
        if posts.values().any(|p| p.slug == post.slug && p.id != post.id) {
            return Err(RepoError::Constraint("duplicate slug".into()));
        }
        posts.insert(post.id, post.clone());
        self.links.lock().unwrap().insert(post.id, links.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.get(id))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .values()
            .find(|p| p.slug == slug && p.published)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.lock().unwrap();
        let mut owned: Vec<Post> = posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.lock().unwrap();
        let mut published: Vec<Post> = posts.values().filter(|p| p.published).cloned().collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(published)
    }

    async fn create(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held().await;
        self.write(post, links)
    }

    async fn update(&self, post: Post, links: &PostLinks) -> Result<Post, RepoError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held().await;
        if self.get(post.id).is_none() {
            return Err(RepoError::NotFound);
        }
        self.write(post, links)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.links.lock().unwrap().remove(&id);
        match self.posts.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl TaxonomyRepository for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.categories.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tags.clone())
    }

    async fn categories_for_post(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let links = self.links.lock().unwrap();
        let ids = links.get(&post_id).map(|l| l.category_ids.clone()).unwrap_or_default();
        Ok(self
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let links = self.links.lock().unwrap();
        let ids = links.get(&post_id).map(|l| l.tag_ids.clone()).unwrap_or_default();
        Ok(self
            .tags
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }
}
