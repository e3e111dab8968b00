//! Service wiring - picks the storage backend and builds the post service.

use std::sync::Arc;

use pancake_core::PostService;
use pancake_core::ports::{PostRepository, SystemClock, TagRepository};

use crate::config::BlogConfig;
use crate::memory::InMemoryBlogStore;
use crate::render::MarkdownRenderer;

#[cfg(feature = "postgres")]
use crate::database::{self, PostgresPostRepository};
#[cfg(feature = "postgres")]
use sea_orm::DbConn;

/// Shared blog state.
#[derive(Clone)]
pub struct BlogState {
    pub posts: PostService,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DbConn>>,
}

impl BlogState {
    /// Build the state with the appropriate storage implementation.
    ///
    /// Falls back to the in-memory store when no database is configured or
    /// the connection fails.
    pub async fn new(config: &BlogConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match database::connect(db_config).await {
                    Ok(conn) => {
                        let conn = Arc::new(conn);
                        let (posts, tags) = PostgresPostRepository::pair(Arc::clone(&conn));
                        tracing::info!("Blog state initialized with PostgreSQL storage");
                        return Self {
                            posts: Self::service(Arc::new(posts), Arc::new(tags), config),
                            db: Some(conn),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        Self::in_memory(config)
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: &BlogConfig) -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        Self {
            posts: Self::service(store.clone(), store, config),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    fn service(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        config: &BlogConfig,
    ) -> PostService {
        PostService::new(
            posts,
            tags,
            Arc::new(MarkdownRenderer::new()),
            Arc::new(SystemClock),
        )
        .with_config(config.posts.clone())
    }
}
