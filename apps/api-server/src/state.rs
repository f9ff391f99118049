//! Application state - shared across all handlers.

use std::sync::Arc;

use redator_core::ports::{
    AuthorRepository, PostRepository, TaxonomyRepository, TextGenerationClient,
};
use redator_core::services::{
    ArticleGenerator, AuthorService, EditingSurface, PostService, RephraseService,
};
use redator_infra::{InMemoryAuthorRepository, InMemoryPostRepository, OpenAiClient};

#[cfg(feature = "postgres")]
use redator_infra::{
    DatabaseConnections, PostgresAuthorRepository, PostgresPostRepository,
    PostgresTaxonomyRepository,
};

use crate::config::AppConfig;
use crate::sessions::SessionRegistry;

/// Storage adapters behind the services.
pub struct Storage {
    pub posts: Arc<dyn PostRepository>,
    pub taxonomy: Arc<dyn TaxonomyRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl Storage {
    pub fn in_memory() -> Self {
        let posts = Arc::new(InMemoryPostRepository::new());
        Self {
            posts: posts.clone(),
            taxonomy: posts,
            authors: Arc::new(InMemoryAuthorRepository::new()),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub authors: AuthorService,
    pub taxonomy: Arc<dyn TaxonomyRepository>,
    pub generator: ArticleGenerator,
    pub rephraser: RephraseService,
    pub editor: EditingSurface,
    pub sessions: Arc<SessionRegistry>,
    pub ai_configured: bool,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let storage = Self::connect_storage(config).await;
        let client = OpenAiClient::new(config.openai.clone());
        let ai_configured = client.is_configured();

        let mut state = Self::assemble(storage, Arc::new(client), ai_configured);
        state.sessions = Arc::new(SessionRegistry::with_idle_ttl(config.session_idle_ttl));
        tracing::info!(
            ai_configured,
            session_idle_secs = config.session_idle_ttl.as_secs(),
            "Application state initialized"
        );
        state
    }

    /// Wire services over the given adapters.
    pub fn assemble(
        storage: Storage,
        client: Arc<dyn TextGenerationClient>,
        ai_configured: bool,
    ) -> Self {
        let posts = PostService::new(storage.posts, storage.taxonomy.clone());
        let generator = ArticleGenerator::new(client.clone());
        let rephraser = RephraseService::new(client);

        Self {
            editor: EditingSurface::new(generator.clone(), rephraser.clone(), posts.clone()),
            posts,
            authors: AuthorService::new(storage.authors),
            taxonomy: storage.taxonomy,
            generator,
            rephraser,
            sessions: Arc::new(SessionRegistry::new()),
            ai_configured,
            #[cfg(feature = "postgres")]
            db: storage.db,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_storage(config: &AppConfig) -> Storage {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Storage::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                Storage {
                    posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                    taxonomy: Arc::new(PostgresTaxonomyRepository::new(conn.main.clone())),
                    authors: Arc::new(PostgresAuthorRepository::new(conn.main.clone())),
                    db: Some(conn),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Storage::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_storage(config: &AppConfig) -> Storage {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Storage::in_memory()
    }
}
