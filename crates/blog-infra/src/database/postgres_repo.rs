//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Category, Post, Tag, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CategoryRepository, Page, PageRequest, PostFilter, PostRepository,
    TagRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::UserName.eq(user_name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        UserEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        CategoryEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// PostgreSQL post repository. A post row and its `post_tags` links are
/// written in one transaction.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    /// Load the tags of `models` with a single query and attach them.
    async fn with_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(ids))
            .find_also_related(TagEntity)
            .order_by_asc(tag::Column::Slug)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for (link, tag) in rows {
            if let Some(tag) = tag {
                tags.entry(link.post_id).or_default().push(tag.into());
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let post_tags = tags.remove(&model.id).unwrap_or_default();
                model.into_post(post_tags)
            })
            .collect())
    }
}

async fn link_tags<C>(conn: &C, post_id: Uuid, tags: &[Tag]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if tags.is_empty() {
        return Ok(());
    }

    let links = tags.iter().map(|tag| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag.id),
    });
    PostTagEntity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.with_tags(vec![model]).await?.pop())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let tags = post.tags.clone();
        let active_model: post::ActiveModel = post.into();

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        link_tags(&txn, model.id, &tags).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into_post(tags))
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let tags = post.tags.clone();
        let active_model: post::ActiveModel = post.into();

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = active_model.update(&txn).await.map_err(map_db_err)?;
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(model.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        link_tags(&txn, model.id, &tags).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into_post(tags))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // `post_tags` rows go with the post (ON DELETE CASCADE).
        let result = PostEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Status.eq(post::PostStatus::Scheduled))
            .filter(post::Column::PublishedAt.is_not_null())
            .filter(post::Column::PublishedAt.lte(now))
            .order_by_asc(post::Column::PublishedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        self.with_tags(result).await
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let mut query = PostEntity::find();

        if let Some(term) = filter.search_term.as_deref() {
            query = query.filter(
                Condition::any()
                    .add(post::Column::Title.contains(term))
                    .add(post::Column::Content.contains(term))
                    .add(post::Column::Summary.contains(term)),
            );
        }

        if let Some(status) = filter.status {
            query = query.filter(post::Column::Status.eq(post::PostStatus::from(status)));
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }

        if let Some(tag_id) = filter.tag_id {
            query = query.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let Some(offset) = page.offset() else {
            return Ok(Page {
                items: Vec::new(),
                total,
            });
        };

        let models = query
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(page.size)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: self.with_tags(models).await?,
            total,
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.with_tags(vec![model]).await?.pop())
    }
}
