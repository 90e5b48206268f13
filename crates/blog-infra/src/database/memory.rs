//! In-memory repositories - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Category, Post, Tag, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CategoryRepository, Page, PageRequest, PostFilter, PostRepository,
    TagRepository, UserRepository,
};

/// In-memory post repository enforcing the unique slug constraint.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn slug_taken(store: &HashMap<Uuid, Post>, post: &Post) -> bool {
        store
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug)
    }
}

fn matches_filter(post: &Post, filter: &PostFilter) -> bool {
    if filter.status.is_some_and(|status| post.status != status) {
        return false;
    }
    if filter
        .category_id
        .is_some_and(|id| post.category_id != Some(id))
    {
        return false;
    }
    if filter
        .tag_id
        .is_some_and(|id| !post.tags.iter().any(|t| t.id == id))
    {
        return false;
    }
    match filter.search_term.as_deref() {
        Some(term) => {
            post.title.contains(term) || post.content.contains(term) || post.summary.contains(term)
        }
        None => true,
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("Post id already exists".to_string()));
        }
        if Self::slug_taken(&store, &post) {
            return Err(RepoError::Constraint(format!(
                "Slug '{}' is already in use",
                post.slug
            )));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if Self::slug_taken(&store, &post) {
            return Err(RepoError::Constraint(format!(
                "Slug '{}' is already in use",
                post.slug
            )));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut due: Vec<Post> = store.values().filter(|p| p.is_due(now)).cloned().collect();
        due.sort_by_key(|p| p.published_at);
        Ok(due)
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        let mut matching: Vec<&Post> = store
            .values()
            .filter(|p| matches_filter(p, filter))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let skip = page
            .offset()
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(usize::MAX);
        let take = usize::try_from(page.size).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(skip).take(take).cloned().collect();

        Ok(Page { items, total })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|p| p.slug == slug).cloned())
    }
}

/// In-memory user repository enforcing unique email and user name.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflict(store: &HashMap<Uuid, User>, user: &User) -> Option<RepoError> {
        store.values().filter(|u| u.id != user.id).find_map(|u| {
            if u.email.eq_ignore_ascii_case(&user.email) {
                Some(RepoError::Constraint("Email already registered".to_string()))
            } else if u.user_name.eq_ignore_ascii_case(&user.user_name) {
                Some(RepoError::Constraint("User name already taken".to_string()))
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&user.id) {
            return Err(RepoError::Constraint("User id already exists".to_string()));
        }
        if let Some(err) = Self::conflict(&store, &user) {
            return Err(err);
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(err) = Self::conflict(&store, &user) {
            return Err(err);
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }
}

/// In-memory category repository enforcing unique slugs.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        if store
            .values()
            .any(|c| c.id == category.id || c.slug == category.slug)
        {
            return Err(RepoError::Constraint(format!(
                "Category '{}' already exists",
                category.slug
            )));
        }
        store.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        if store
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug)
        {
            return Err(RepoError::Constraint(format!(
                "Category '{}' already exists",
                category.slug
            )));
        }
        store.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|c| c.slug == slug).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }
}

/// In-memory tag repository enforcing unique slugs.
#[derive(Default)]
pub struct InMemoryTagRepository {
    store: RwLock<HashMap<Uuid, Tag>>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|t| t.id == tag.id || t.slug == tag.slug) {
            return Err(RepoError::Constraint(format!(
                "Tag '{}' already exists",
                tag.slug
            )));
        }
        store.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&tag.id) {
            return Err(RepoError::NotFound);
        }
        if store.values().any(|t| t.id != tag.id && t.slug == tag.slug) {
            return Err(RepoError::Constraint(format!(
                "Tag '{}' already exists",
                tag.slug
            )));
        }
        store.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|t| t.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::{PostContent, PostStatus};
    use chrono::TimeDelta;

    fn post(title: &str) -> Post {
        Post::new(
            Uuid::new_v4(),
            PostContent {
                title: title.to_string(),
                content: format!("{title} body"),
                summary: "summary".to_string(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("Same Title")).await.unwrap();

        let err = repo.insert(post("Same title")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let err = repo.update(post("Ghost")).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_find_due_scheduled() {
        let repo = InMemoryPostRepository::new();
        let now = Utc::now();

        let mut due = post("Due");
        due.status = PostStatus::Scheduled;
        due.published_at = Some(now - TimeDelta::minutes(5));

        let mut future = post("Future");
        future.status = PostStatus::Scheduled;
        future.published_at = Some(now + TimeDelta::minutes(5));

        let mut published = post("Published");
        published.status = PostStatus::Published;
        published.published_at = Some(now - TimeDelta::days(1));

        repo.insert(due.clone()).await.unwrap();
        repo.insert(future).await.unwrap();
        repo.insert(published).await.unwrap();

        let found = repo.find_due_scheduled(now).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, due.id);
    }

    #[tokio::test]
    async fn test_find_page_filters_and_paginates() {
        let repo = InMemoryPostRepository::new();
        for i in 0..5 {
            repo.insert(post(&format!("Rust tips {i}"))).await.unwrap();
        }
        repo.insert(post("Gardening")).await.unwrap();

        let filter = PostFilter {
            search_term: Some("Rust".to_string()),
            ..Default::default()
        };
        let page = repo
            .find_page(&filter, PageRequest { number: 2, size: 2 })
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);

        let published_only = PostFilter {
            status: Some(PostStatus::Published),
            ..Default::default()
        };
        let page = repo
            .find_page(&published_only, PageRequest { number: 1, size: 10 })
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_find_page_beyond_addressable_range_is_empty() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("Only one")).await.unwrap();

        let page = repo
            .find_page(
                &PostFilter::default(),
                PageRequest {
                    number: u64::MAX,
                    size: 100,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_find_page_by_category_and_tag() {
        let repo = InMemoryPostRepository::new();
        let rust = Tag::new("Rust");
        let category = Uuid::new_v4();

        let mut tagged = post("Borrowing");
        tagged.category_id = Some(category);
        tagged.tags = vec![rust.clone()];
        repo.insert(tagged.clone()).await.unwrap();

        let mut untagged = post("Lifetimes");
        untagged.category_id = Some(category);
        repo.insert(untagged).await.unwrap();
        repo.insert(post("Elsewhere")).await.unwrap();

        let by_category = PostFilter {
            category_id: Some(category),
            ..Default::default()
        };
        let page = repo
            .find_page(&by_category, PageRequest { number: 1, size: 10 })
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        let by_tag = PostFilter {
            tag_id: Some(rust.id),
            ..by_category
        };
        let page = repo
            .find_page(&by_tag, PageRequest { number: 1, size: 10 })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, tagged.id);
    }

    #[tokio::test]
    async fn test_tag_slugs_are_unique() {
        let repo = InMemoryTagRepository::new();
        repo.insert(Tag::new("Web Dev")).await.unwrap();

        let err = repo.insert(Tag::new("web-dev")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
        assert!(repo.find_by_slug("web-dev").await.unwrap().is_some());
    }
}
