use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lifecycle::{self, Transition};
use super::status::PostStatus;
use super::taxonomy::Tag;
use crate::error::DomainError;

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub category_id: Option<Uuid>,
    /// Ordered by slug, no two alike.
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable content of a post, shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct PostContent {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Create a new draft post authored by `author_id`.
    pub fn new(author_id: Uuid, body: PostContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            slug: slugify(&body.title),
            title: body.title,
            content: body.content,
            summary: body.summary,
            status: PostStatus::Draft,
            published_at: None,
            featured_image_url: body.featured_image_url,
            meta_title: body.meta_title,
            meta_description: body.meta_description,
            meta_keywords: body.meta_keywords,
            category_id: body.category_id,
            tags: sorted_tags(body.tags),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status == PostStatus::Archived {
            return Err(DomainError::InvalidOperation(
                "Archived posts cannot be modified.".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace the editable content. The slug follows the title.
    pub fn edit(&mut self, body: PostContent) -> Result<(), DomainError> {
        self.ensure_editable()?;

        self.slug = slugify(&body.title);
        self.title = body.title;
        self.content = body.content;
        self.summary = body.summary;
        self.featured_image_url = body.featured_image_url;
        self.meta_title = body.meta_title;
        self.meta_description = body.meta_description;
        self.meta_keywords = body.meta_keywords;
        self.category_id = body.category_id;
        self.tags = sorted_tags(body.tags);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate and apply a status change requested by name.
    pub fn change_status(
        &mut self,
        requested: &str,
        publish_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Transition, DomainError> {
        let transition = lifecycle::validate_at(self.status, requested, publish_date, now)?;
        self.apply(transition, now);
        Ok(transition)
    }

    /// Promote a due scheduled post to published.
    pub fn publish_scheduled(&mut self, now: DateTime<Utc>) -> Result<Transition, DomainError> {
        let transition = lifecycle::transition(self.status, PostStatus::Published, None, now)?;
        self.apply(transition, now);
        Ok(transition)
    }

    fn apply(&mut self, transition: Transition, now: DateTime<Utc>) {
        self.status = transition.status;
        self.published_at = transition.resolve_published_at(self.published_at);
        self.updated_at = now;
    }

    /// Whether the sweeper should publish this post at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled && self.published_at.is_some_and(|at| at <= now)
    }
}

fn sorted_tags(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort_by(|a, b| a.slug.cmp(&b.slug));
    tags.dedup_by(|a, b| a.slug == b.slug);
    tags
}

/// Derive a URL slug from a title: lowercase ASCII alphanumerics separated
/// by single hyphens. Apostrophes and quotes are dropped rather than split on.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if matches!(ch, '\'' | '"' | '\u{2019}') {
            continue;
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn draft() -> Post {
        Post::new(
            Uuid::new_v4(),
            PostContent {
                title: "Hello, World!".to_string(),
                content: "Body".to_string(),
                summary: "Summary".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_new_post_is_draft() {
        let post = draft();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.slug, "hello-world");
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust's Ownership Model"), "rusts-ownership-model");
        assert_eq!(slugify("  What is   async?  "), "what-is-async");
        assert_eq!(slugify("Version 2.0 released"), "version-2-0-released");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_change_status_updates_in_place() {
        let mut post = draft();
        let id = post.id;
        let now = Utc::now();

        post.change_status("Published", None, now).unwrap();

        assert_eq!(post.id, id);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.published_at, Some(now));
        assert_eq!(post.updated_at, now);
    }

    #[test]
    fn test_rejected_change_leaves_post_untouched() {
        let mut post = draft();
        let before = post.clone();

        assert!(post.change_status("Archived", None, Utc::now()).is_err());
        assert_eq!(post, before);
    }

    #[test]
    fn test_is_due() {
        let now = Utc::now();
        let mut post = draft();
        assert!(!post.is_due(now));

        post.change_status("Scheduled", Some(now - TimeDelta::minutes(1)), now)
            .unwrap();
        assert!(post.is_due(now));

        post.published_at = Some(now + TimeDelta::minutes(1));
        assert!(!post.is_due(now));
    }

    #[test]
    fn test_publish_scheduled_sets_now() {
        let now = Utc::now();
        let mut post = draft();
        post.change_status("Scheduled", Some(now - TimeDelta::hours(1)), now)
            .unwrap();

        let later = now + TimeDelta::seconds(30);
        post.publish_scheduled(later).unwrap();

        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.published_at, Some(later));
    }

    #[test]
    fn test_tags_are_sorted_and_unique() {
        let mut post = draft();
        post.edit(PostContent {
            title: "Tagged".to_string(),
            tags: vec![Tag::new("Rust"), Tag::new("Async"), Tag::new("rust")],
            ..Default::default()
        })
        .unwrap();

        let names: Vec<&str> = post.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Async", "Rust"]);
    }

    #[test]
    fn test_archived_post_cannot_be_edited() {
        let mut post = draft();
        post.status = PostStatus::Archived;

        let err = post
            .edit(PostContent {
                title: "New".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));
    }
}
