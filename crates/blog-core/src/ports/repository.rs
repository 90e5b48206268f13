use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post, PostStatus, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity in place. Each call is committed on its own.
    ///
    /// Returns [`RepoError::NotFound`] when no row has the entity's ID.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their user name.
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepoError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Filters for listing posts.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Matched against title, content and summary.
    pub search_term: Option<String>,
    pub status: Option<PostStatus>,
    pub category_id: Option<Uuid>,
    /// Only posts carrying this tag.
    pub tag_id: Option<Uuid>,
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    /// Rows to skip, or `None` when the page lies beyond what a database
    /// offset (a signed 64-bit value) can address.
    pub fn offset(&self) -> Option<u64> {
        self.number
            .checked_sub(1)?
            .checked_mul(self.size)
            .filter(|offset| *offset <= i64::MAX as u64)
    }
}

/// A page of results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts in `Scheduled` status whose `published_at` is at or before `now`.
    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    /// Filtered page of posts, newest first.
    async fn find_page(&self, filter: &PostFilter, page: PageRequest)
    -> Result<Page<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Number of stored categories.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Tag repository. Slugs are unique.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}
