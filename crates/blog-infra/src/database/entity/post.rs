//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain;

/// Post status as stored in the `posts.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PostStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Published")]
    Published,
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
    #[sea_orm(string_value = "Unpublished")]
    Unpublished,
    #[sea_orm(string_value = "Archived")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub summary: String,
    pub status: PostStatus,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<PostStatus> for domain::PostStatus {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => domain::PostStatus::Draft,
            PostStatus::Published => domain::PostStatus::Published,
            PostStatus::Scheduled => domain::PostStatus::Scheduled,
            PostStatus::Unpublished => domain::PostStatus::Unpublished,
            PostStatus::Archived => domain::PostStatus::Archived,
        }
    }
}

impl From<domain::PostStatus> for PostStatus {
    fn from(status: domain::PostStatus) -> Self {
        match status {
            domain::PostStatus::Draft => PostStatus::Draft,
            domain::PostStatus::Published => PostStatus::Published,
            domain::PostStatus::Scheduled => PostStatus::Scheduled,
            domain::PostStatus::Unpublished => PostStatus::Unpublished,
            domain::PostStatus::Archived => PostStatus::Archived,
        }
    }
}

impl Model {
    /// Tags live in `post_tags`, so they are loaded separately and joined here.
    pub fn into_post(self, tags: Vec<domain::Tag>) -> domain::Post {
        domain::Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            summary: self.summary,
            status: self.status.into(),
            published_at: self.published_at.map(Into::into),
            featured_image_url: self.featured_image_url,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            meta_keywords: self.meta_keywords,
            category_id: self.category_id,
            tags,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel. Tags are written to
/// `post_tags` by the repository.
impl From<domain::Post> for ActiveModel {
    fn from(post: domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            summary: Set(post.summary),
            status: Set(post.status.into()),
            published_at: Set(post.published_at.map(Into::into)),
            featured_image_url: Set(post.featured_image_url),
            meta_title: Set(post.meta_title),
            meta_description: Set(post.meta_description),
            meta_keywords: Set(post.meta_keywords),
            category_id: Set(post.category_id),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
