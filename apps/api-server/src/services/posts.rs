//! Post use cases: listing, CRUD and status changes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use blog_core::domain::{Policy, Post, PostContent, PostStatus, Tag, slugify};
use blog_core::error::{DomainError, RepoError};
use blog_core::ports::{
    CategoryRepository, Page, PageRequest, PostFilter, PostRepository, TagRepository,
    UserRepository,
};
use blog_shared::dto::{
    ChangePostStatusRequest, CreatePostRequest, PostListQuery, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::validation;

const DEFAULT_PAGE_SIZE: u64 = 10;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    users: Arc<dyn UserRepository>,
}

/// Validated list parameters. Category and tag slugs are resolved when the
/// list runs; an unknown slug matches nothing.
#[derive(Debug, Clone, Default)]
pub struct PostListParams {
    pub search_term: Option<String>,
    pub status: Option<PostStatus>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
}

/// A post with the author and category names shown next to it.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub author_name: String,
    pub category_name: Option<String>,
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::NotFound {
        entity_type: "Post",
        id,
    }
}

fn slug_conflict(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Duplicate("A post with the same title already exists.".to_string())
        }
        other => other.into(),
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn empty_page<T>() -> Page<T> {
    Page {
        items: Vec::new(),
        total: 0,
    }
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
            users,
        }
    }

    /// Resolve list parameters. An unknown status is rejected, not ignored.
    pub fn list_params(
        query: &PostListQuery,
    ) -> Result<(PostListParams, PageRequest), DomainError> {
        validation::check(query, |_| {})?;

        let page = PageRequest {
            number: query.page_number.unwrap_or(1),
            size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        if page.offset().is_none() {
            return Err(DomainError::InvalidArgument(
                "Page number is out of range.".to_string(),
            ));
        }

        let status = query
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<PostStatus>)
            .transpose()?;

        let params = PostListParams {
            search_term: trimmed(query.search_term.as_deref()),
            status,
            category_slug: trimmed(query.category_slug.as_deref()),
            tag_slug: trimmed(query.tag_slug.as_deref()),
        };
        Ok((params, page))
    }

    pub async fn list(
        &self,
        params: &PostListParams,
        page: PageRequest,
    ) -> Result<Page<PostView>, DomainError> {
        let mut filter = PostFilter {
            search_term: params.search_term.clone(),
            status: params.status,
            ..Default::default()
        };

        if let Some(slug) = params.category_slug.as_deref() {
            match self.categories.find_by_slug(slug).await? {
                Some(category) => filter.category_id = Some(category.id),
                None => return Ok(empty_page()),
            }
        }
        if let Some(slug) = params.tag_slug.as_deref() {
            match self.tags.find_by_slug(slug).await? {
                Some(tag) => filter.tag_id = Some(tag.id),
                None => return Ok(empty_page()),
            }
        }

        let page = self.posts.find_page(&filter, page).await?;
        Ok(Page {
            items: self.views(page.items).await?,
            total: page.total,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Attach author and category names.
    pub async fn view(&self, post: Post) -> Result<PostView, DomainError> {
        Ok(PostView {
            author_name: self.author_name(post.author_id).await?,
            category_name: self.category_name(post.category_id).await?,
            post,
        })
    }

    /// Like [`view`](Self::view), looking each author and category up once.
    async fn views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let mut authors: HashMap<Uuid, String> = HashMap::new();
        let mut categories: HashMap<Uuid, Option<String>> = HashMap::new();
        let mut views = Vec::with_capacity(posts.len());

        for post in posts {
            let author_name = match authors.get(&post.author_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self.author_name(post.author_id).await?;
                    authors.insert(post.author_id, name.clone());
                    name
                }
            };
            let category_name = match post.category_id {
                Some(id) => match categories.get(&id) {
                    Some(name) => name.clone(),
                    None => {
                        let name = self.category_name(Some(id)).await?;
                        categories.insert(id, name.clone());
                        name
                    }
                },
                None => None,
            };
            views.push(PostView {
                post,
                author_name,
                category_name,
            });
        }
        Ok(views)
    }

    async fn author_name(&self, author_id: Uuid) -> Result<String, DomainError> {
        Ok(self
            .users
            .find_by_id(author_id)
            .await?
            .map(|user| user.full_name())
            .unwrap_or_default())
    }

    async fn category_name(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Option<String>, DomainError> {
        let Some(id) = category_id else {
            return Ok(None);
        };
        Ok(self.categories.find_by_id(id).await?.map(|c| c.name))
    }

    /// The category must exist when one is given.
    async fn resolve_category(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Option<Uuid>, DomainError> {
        let Some(id) = category_id else {
            return Ok(None);
        };
        match self.categories.find_by_id(id).await? {
            Some(category) => Ok(Some(category.id)),
            None => Err(DomainError::InvalidArgument(format!(
                "Category with ID {} not found.",
                id
            ))),
        }
    }

    /// Look tags up by slug, creating the missing ones.
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<Tag>, DomainError> {
        let mut resolved: Vec<Tag> = Vec::with_capacity(names.len());

        for name in names {
            let name = name.trim();
            let slug = slugify(name);
            if resolved.iter().any(|t| t.slug == slug) {
                continue;
            }

            let tag = match self.tags.find_by_slug(&slug).await? {
                Some(tag) => tag,
                None => match self.tags.insert(Tag::new(name)).await {
                    Ok(tag) => {
                        tracing::info!(tag_id = %tag.id, tag_slug = %tag.slug, "Tag created");
                        tag
                    }
                    // Created concurrently by another request.
                    Err(RepoError::Constraint(_)) => {
                        self.tags.find_by_slug(&slug).await?.ok_or_else(|| {
                            DomainError::Internal(format!("Tag '{}' vanished after insert", slug))
                        })?
                    }
                    Err(e) => return Err(e.into()),
                },
            };
            resolved.push(tag);
        }

        Ok(resolved)
    }

    pub async fn create(
        &self,
        identity: &Identity,
        req: CreatePostRequest,
    ) -> Result<Uuid, DomainError> {
        self.create_at(identity, req, Utc::now()).await
    }

    async fn create_at(
        &self,
        identity: &Identity,
        req: CreatePostRequest,
        now: DateTime<Utc>,
    ) -> Result<Uuid, DomainError> {
        identity.require(Policy::RequireAdmin)?;

        validation::check(&req, |errors| {
            if req.published_at.is_some_and(|at| at <= now) {
                validation::reject(errors, "published_at", "Published date must be in the future.");
            }
        })?;

        let status: PostStatus = req.status.parse()?;
        if !status.is_initial() {
            return Err(DomainError::InvalidArgument(format!(
                "New posts must start as Draft, Published or Scheduled, not {}.",
                status
            )));
        }

        let category_id = self.resolve_category(req.category_id).await?;
        let tags = self.resolve_tags(&req.tags).await?;

        let mut post = Post::new(
            identity.user_id,
            PostContent {
                title: req.title,
                content: req.content,
                summary: req.summary,
                featured_image_url: req.featured_image_url,
                meta_title: req.meta_title,
                meta_description: req.meta_description,
                meta_keywords: req.meta_keywords,
                category_id,
                tags,
            },
        );
        if status != PostStatus::Draft {
            post.change_status(status.as_str(), req.published_at, now)?;
        }

        let post = self.posts.insert(post).await.map_err(slug_conflict)?;
        tracing::info!(
            post_id = %post.id,
            status = %post.status,
            author_id = %post.author_id,
            "Post created"
        );
        Ok(post.id)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        identity.require(Policy::RequireEditor)?;
        validation::check(&req, |_| {})?;

        let mut post = self.get(id).await?;
        post.ensure_editable()?;

        let category_id = self.resolve_category(req.category_id).await?;
        let tags = self.resolve_tags(&req.tags).await?;
        post.edit(PostContent {
            title: req.title,
            content: req.content,
            summary: req.summary,
            featured_image_url: req.featured_image_url,
            meta_title: req.meta_title,
            meta_description: req.meta_description,
            meta_keywords: req.meta_keywords,
            category_id,
            tags,
        })?;

        let post = self.posts.update(post).await.map_err(slug_conflict)?;
        tracing::info!(post_id = %post.id, editor_id = %identity.user_id, "Post updated");
        Ok(post)
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<(), DomainError> {
        identity.require(Policy::RequireAdmin)?;

        match self.posts.delete(id).await {
            Ok(()) => {
                tracing::info!(post_id = %id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn change_status(
        &self,
        identity: &Identity,
        id: Uuid,
        req: ChangePostStatusRequest,
    ) -> Result<Post, DomainError> {
        self.change_status_at(identity, id, req, Utc::now()).await
    }

    async fn change_status_at(
        &self,
        identity: &Identity,
        id: Uuid,
        req: ChangePostStatusRequest,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        identity.require(Policy::RequireAdmin)?;

        let mut post = self.get(id).await?;
        let from = post.status;
        let transition = post.change_status(&req.new_status, req.publish_date, now)?;

        let post = match self.posts.update(post).await {
            Ok(post) => post,
            Err(RepoError::NotFound) => return Err(not_found(id)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            post_id = %id,
            from = %from,
            to = %transition.status,
            published_at = ?post.published_at,
            "Post status changed"
        );
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::{Category, NewUser, Role, User};
    use blog_core::ports::BaseRepository;
    use blog_infra::{
        InMemoryCategoryRepository, InMemoryPostRepository, InMemoryTagRepository,
        InMemoryUserRepository,
    };
    use chrono::TimeDelta;

    fn caller(roles: Vec<Role>) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            user_name: "admin".to_string(),
            roles,
        }
    }

    struct Setup {
        svc: PostService,
        categories: Arc<InMemoryCategoryRepository>,
        tags: Arc<InMemoryTagRepository>,
        users: Arc<InMemoryUserRepository>,
    }

    fn setup() -> Setup {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let tags = Arc::new(InMemoryTagRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let svc = PostService::new(
            Arc::new(InMemoryPostRepository::new()),
            categories.clone(),
            tags.clone(),
            users.clone(),
        );
        Setup {
            svc,
            categories,
            tags,
            users,
        }
    }

    fn service() -> PostService {
        setup().svc
    }

    fn create_request(title: &str, status: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: "Body".to_string(),
            summary: "Summary".to_string(),
            status: status.to_string(),
            published_at: None,
            featured_image_url: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            category_id: None,
            tags: Vec::new(),
        }
    }

    fn status_request(
        new_status: &str,
        publish_date: Option<DateTime<Utc>>,
    ) -> ChangePostStatusRequest {
        ChangePostStatusRequest {
            new_status: new_status.to_string(),
            publish_date,
        }
    }

    #[tokio::test]
    async fn test_create_published_sets_published_at() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);
        let now = Utc::now();

        let id = svc
            .create_at(&admin, create_request("Hello World", "Published"), now)
            .await
            .unwrap();
        let post = svc.get(id).await.unwrap();

        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.published_at, Some(now));
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.author_id, admin.user_id);
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let svc = service();
        let editor = caller(vec![Role::Editor]);

        let err = svc
            .create(&editor, create_request("Nope", "Draft"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);

        let mut req = create_request("", "Draft");
        req.summary = "x".repeat(501);
        match svc.create(&admin, req).await.unwrap_err() {
            DomainError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected: {other:?}"),
        }

        let err = svc
            .create(&admin, create_request("Archived start", "Archived"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let err = svc
            .create(&admin, create_request("Scheduled no date", "Scheduled"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let mut past = create_request("Past", "Scheduled");
        past.published_at = Some(Utc::now() - TimeDelta::hours(1));
        let err = svc.create(&admin, past).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_duplicate_title_conflicts() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);

        svc.create(&admin, create_request("Same", "Draft")).await.unwrap();
        let err = svc
            .create(&admin, create_request("same", "Draft"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_change_status_flow() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);
        let id = svc
            .create(&admin, create_request("Lifecycle", "Draft"))
            .await
            .unwrap();

        let at = Utc::now() + TimeDelta::days(1);
        let post = svc
            .change_status(&admin, id, status_request("Scheduled", Some(at)))
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Scheduled);
        assert_eq!(post.published_at, Some(at));

        let now = Utc::now();
        let post = svc
            .change_status_at(&admin, id, status_request("Published", None), now)
            .await
            .unwrap();
        assert_eq!(post.published_at, Some(now));

        let post = svc
            .change_status(&admin, id, status_request("Unpublished", None))
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Unpublished);
        assert_eq!(post.published_at, Some(now));

        let stored = svc.get(id).await.unwrap();
        assert_eq!(stored, post);
    }

    #[tokio::test]
    async fn test_change_status_errors() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);
        let id = svc
            .create(&admin, create_request("Errors", "Draft"))
            .await
            .unwrap();

        let err = svc
            .change_status(&admin, Uuid::new_v4(), status_request("Published", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = svc
            .change_status(&admin, id, status_request("Bogus", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let err = svc
            .change_status(&admin, id, status_request("Archived", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));

        let editor = caller(vec![Role::Editor]);
        let err = svc
            .change_status(&editor, id, status_request("Published", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        assert_eq!(svc.get(id).await.unwrap().status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn test_archived_post_cannot_be_edited() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);
        let id = svc
            .create(&admin, create_request("Final", "Published"))
            .await
            .unwrap();
        svc.change_status(&admin, id, status_request("Archived", None))
            .await
            .unwrap();

        let req = UpdatePostRequest {
            title: "Final v2".to_string(),
            content: "Body".to_string(),
            summary: "Summary".to_string(),
            featured_image_url: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            category_id: None,
            tags: Vec::new(),
        };
        let err = svc.update(&admin, id, req).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);

        let err = svc.delete(&admin, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn test_list_params() {
        let (params, page) = PostService::list_params(&PostListQuery::default()).unwrap();
        assert_eq!(page, PageRequest { number: 1, size: 10 });
        assert!(params.status.is_none());

        let query = PostListQuery {
            status: Some("published".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            PostService::list_params(&query),
            Err(DomainError::InvalidArgument(_))
        ));

        let query = PostListQuery {
            page_size: Some(101),
            ..Default::default()
        };
        assert!(matches!(
            PostService::list_params(&query),
            Err(DomainError::Validation(_))
        ));

        let query = PostListQuery {
            category_slug: Some("  technology ".to_string()),
            tag_slug: Some(String::new()),
            ..Default::default()
        };
        let (params, _) = PostService::list_params(&query).unwrap();
        assert_eq!(params.category_slug.as_deref(), Some("technology"));
        assert!(params.tag_slug.is_none());
    }

    #[test]
    fn test_list_params_rejects_unaddressable_page() {
        let query = PostListQuery {
            page_number: Some(u64::MAX),
            page_size: Some(100),
            ..Default::default()
        };
        match PostService::list_params(&query) {
            Err(DomainError::InvalidArgument(message)) => {
                assert_eq!(message, "Page number is out of range.")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    async fn technology(categories: &InMemoryCategoryRepository) -> Category {
        categories
            .insert(Category::new("Technology", None))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_with_category_and_tags() {
        let Setup {
            svc,
            categories,
            tags,
            ..
        } = setup();
        let admin = caller(vec![Role::Admin]);
        let category = technology(&categories).await;

        let mut req = create_request("Tagged", "Draft");
        req.category_id = Some(category.id);
        req.tags = vec!["Rust".to_string(), " rust ".to_string(), "Web Dev".to_string()];
        let id = svc.create(&admin, req).await.unwrap();

        let post = svc.get(id).await.unwrap();
        assert_eq!(post.category_id, Some(category.id));
        let slugs: Vec<&str> = post.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["rust", "web-dev"]);

        let mut req = create_request("Tagged again", "Draft");
        req.tags = vec!["RUST".to_string()];
        let again_id = svc.create(&admin, req).await.unwrap();
        let again = svc.get(again_id).await.unwrap();
        let rust = tags.find_by_slug("rust").await.unwrap().unwrap();
        assert_eq!(again.tags, vec![rust]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_rejected() {
        let svc = service();
        let admin = caller(vec![Role::Admin]);

        let mut req = create_request("Orphan", "Draft");
        req.category_id = Some(Uuid::new_v4());
        let err = svc.create(&admin, req).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let mut req = create_request("Bad tag", "Draft");
        req.tags = vec!["t".repeat(51)];
        let err = svc.create(&admin, req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_category_and_tags() {
        let Setup {
            svc, categories, ..
        } = setup();
        let admin = caller(vec![Role::Admin]);
        let category = technology(&categories).await;

        let mut req = create_request("Retag me", "Draft");
        req.tags = vec!["Old".to_string()];
        let id = svc.create(&admin, req).await.unwrap();

        let post = svc
            .update(
                &admin,
                id,
                UpdatePostRequest {
                    title: "Retag me".to_string(),
                    content: "Body".to_string(),
                    summary: "Summary".to_string(),
                    featured_image_url: None,
                    meta_title: None,
                    meta_description: None,
                    meta_keywords: None,
                    category_id: Some(category.id),
                    tags: vec!["New".to_string()],
                },
            )
            .await
            .unwrap();

        assert_eq!(post.category_id, Some(category.id));
        assert_eq!(post.tags.len(), 1);
        assert_eq!(post.tags[0].name, "New");
    }

    #[tokio::test]
    async fn test_list_filters_by_category_and_tag_slug() {
        let Setup {
            svc, categories, ..
        } = setup();
        let admin = caller(vec![Role::Admin]);
        let category = technology(&categories).await;

        let mut req = create_request("Filed and tagged", "Published");
        req.category_id = Some(category.id);
        req.tags = vec!["Rust".to_string()];
        svc.create(&admin, req).await.unwrap();

        let mut req = create_request("Filed only", "Published");
        req.category_id = Some(category.id);
        svc.create(&admin, req).await.unwrap();
        svc.create(&admin, create_request("Loose", "Published"))
            .await
            .unwrap();

        let page = PageRequest { number: 1, size: 10 };
        let by_category = PostListParams {
            category_slug: Some("technology".to_string()),
            ..Default::default()
        };
        let result = svc.list(&by_category, page).await.unwrap();
        assert_eq!(result.total, 2);
        assert!(
            result
                .items
                .iter()
                .all(|v| v.category_name.as_deref() == Some("Technology"))
        );

        let by_tag = PostListParams {
            tag_slug: Some("rust".to_string()),
            ..by_category
        };
        let result = svc.list(&by_tag, page).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].post.title, "Filed and tagged");

        let unknown = PostListParams {
            tag_slug: Some("cobol".to_string()),
            ..Default::default()
        };
        let result = svc.list(&unknown, page).await.unwrap();
        assert_eq!(result.total, 0);
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn test_view_names_author_and_category() {
        let Setup {
            svc,
            categories,
            users,
            ..
        } = setup();
        let author = users
            .insert(User::new(
                NewUser {
                    user_name: "ada".to_string(),
                    email: "ada@example.com".to_string(),
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    phone_number: None,
                    roles: vec![Role::Admin],
                },
                "hash".to_string(),
            ))
            .await
            .unwrap();
        let category = technology(&categories).await;

        let identity = Identity {
            roles: vec![Role::Admin],
            user_id: author.id,
            ..caller(vec![])
        };
        let mut req = create_request("Named", "Draft");
        req.category_id = Some(category.id);
        let id = svc.create(&identity, req).await.unwrap();

        let view = svc.view(svc.get(id).await.unwrap()).await.unwrap();
        assert_eq!(view.author_name, author.full_name());
        assert_eq!(view.category_name.as_deref(), Some("Technology"));

        let anon = caller(vec![Role::Admin]);
        let orphan_id = svc
            .create(&anon, create_request("Anon", "Draft"))
            .await
            .unwrap();
        let view = svc.view(svc.get(orphan_id).await.unwrap()).await.unwrap();
        assert_eq!(view.author_name, "");
        assert!(view.category_name.is_none());
    }
}
