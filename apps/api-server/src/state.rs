//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    CategoryRepository, PasswordService, PostRepository, TagRepository, TokenService,
    UserRepository,
};
use blog_infra::database::DatabaseConfig;
use blog_infra::{
    Argon2PasswordService, InMemoryCategoryRepository, InMemoryPostRepository,
    InMemoryTagRepository, InMemoryUserRepository, JwtConfig, JwtTokenService,
};

#[cfg(feature = "postgres")]
use blog_infra::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

use crate::services::{PostService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub post_service: Arc<PostService>,
    pub user_service: Arc<UserService>,
}

/// One repository per aggregate, all backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
            tags: Arc::new(InMemoryTagRepository::new()),
        }
    }
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Repositories::in_memory();
    };

    match blog_infra::connect(config).await {
        Ok(conn) => {
            let conn = Arc::new(conn);
            Repositories {
                posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                tags: Arc::new(PostgresTagRepository::new(conn)),
            }
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            Repositories::in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_db_config: Option<&DatabaseConfig>) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    Repositories::in_memory()
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when
    /// no database is reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>, jwt: JwtConfig) -> Self {
        let repos = repositories(db_config).await;
        let state = Self::from_parts(repos, Arc::new(JwtTokenService::new(jwt)));

        tracing::info!("Application state initialized");
        state
    }

    pub fn from_parts(repos: Repositories, tokens: Arc<dyn TokenService>) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            post_service: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                repos.tags,
                repos.users.clone(),
            )),
            user_service: Arc::new(UserService::new(repos.users, passwords, tokens.clone())),
            posts: repos.posts,
            categories: repos.categories,
            tokens,
        }
    }
}
