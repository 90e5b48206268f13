//! Data Transfer Objects - request/response types for the API.
//!
//! Field rules are declared with `validator`; checks that need more than one
//! field or the clock live with the use cases.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Letters, digits, dots, underscores and hyphens; 3 to 50 of them.
pub static USER_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{3,50}$").unwrap());

pub const TAG_MAX: usize = 50;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn tag_names(tags: &[String]) -> Result<(), ValidationError> {
    let valid =
        |tag: &String| tag.chars().count() <= TAG_MAX && tag.chars().any(char::is_alphanumeric);
    if !tags.iter().all(valid) {
        return Err(ValidationError::new("tag"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(max = 200, message = "Title must not be empty and must not exceed 200 characters."),
        custom(
            function = "not_blank",
            message = "Title must not be empty and must not exceed 200 characters."
        )
    )]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Content must not be empty."))]
    pub content: String,
    #[validate(
        length(
            max = 500,
            message = "Summary must not be empty and must not exceed 500 characters."
        ),
        custom(
            function = "not_blank",
            message = "Summary must not be empty and must not exceed 500 characters."
        )
    )]
    pub summary: String,
    /// Initial status: `Draft`, `Published` or `Scheduled`.
    pub status: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Meta title must not exceed 200 characters."))]
    pub meta_title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Meta description must not exceed 500 characters."))]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Tag names; unknown tags are created.
    #[serde(default)]
    #[validate(custom(
        function = "tag_names",
        message = "Each tag must not be empty and must not exceed 50 characters."
    ))]
    pub tags: Vec<String>,
}

/// Request to edit a post's content. Category and tags are replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(
        length(max = 200, message = "Title must not be empty and must not exceed 200 characters."),
        custom(
            function = "not_blank",
            message = "Title must not be empty and must not exceed 200 characters."
        )
    )]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Content must not be empty."))]
    pub content: String,
    #[validate(
        length(
            max = 500,
            message = "Summary must not be empty and must not exceed 500 characters."
        ),
        custom(
            function = "not_blank",
            message = "Summary must not be empty and must not exceed 500 characters."
        )
    )]
    pub summary: String,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Meta title must not exceed 200 characters."))]
    pub meta_title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Meta description must not exceed 500 characters."))]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    #[validate(custom(
        function = "tag_names",
        message = "Each tag must not be empty and must not exceed 50 characters."
    ))]
    pub tags: Vec<String>,
}

/// Request to move a post to another status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePostStatusRequest {
    pub new_status: String,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
}

/// Query string for listing posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostListQuery {
    #[validate(range(min = 1, message = "Page number must be at least 1."))]
    pub page_number: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100."))]
    pub page_size: Option<u64>,
    pub search_term: Option<String>,
    pub status: Option<String>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub author_name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response to a successful post creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request to create a user (admin only). The password policy is checked
/// by the use case.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(regex(
        path = *USER_NAME_PATTERN,
        message = "Username must be 3 to 50 characters and can only contain letters, numbers, dots, underscores, and hyphens."
    ))]
    pub user_name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    pub password: String,
    #[validate(
        length(
            max = 50,
            message = "First name must not be empty and must not exceed 50 characters."
        ),
        custom(
            function = "not_blank",
            message = "First name must not be empty and must not exceed 50 characters."
        )
    )]
    pub first_name: String,
    #[validate(
        length(
            max = 50,
            message = "Last name must not be empty and must not exceed 50 characters."
        ),
        custom(
            function = "not_blank",
            message = "Last name must not be empty and must not exceed 50 characters."
        )
    )]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters."))]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Request to update the caller's own profile. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCurrentUserRequest {
    #[serde(default)]
    #[validate(length(max = 50, message = "First name must not exceed 50 characters."))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Last name must not exceed 50 characters."))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "A valid email address is required."))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters."))]
    pub phone_number: Option<String>,
}

/// Request to change the caller's password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required."))]
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_request() -> CreatePostRequest {
        CreatePostRequest {
            title: "Hello".to_string(),
            content: "Body".to_string(),
            summary: "Summary".to_string(),
            status: "Draft".to_string(),
            published_at: None,
            featured_image_url: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            category_id: None,
            tags: vec!["Rust".to_string()],
        }
    }

    #[test]
    fn test_post_field_rules() {
        assert!(post_request().validate().is_ok());

        let mut req = post_request();
        req.title = "   ".to_string();
        req.meta_title = Some("x".repeat(201));
        req.tags.push("!!!".to_string());

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("meta_title"));
        assert!(fields.contains_key("tags"));
        assert!(!fields.contains_key("summary"));
    }

    #[test]
    fn test_tag_length_counts_characters() {
        assert!(tag_names(&["é".repeat(TAG_MAX)]).is_ok());
        assert!(tag_names(&["a".repeat(TAG_MAX + 1)]).is_err());
        assert!(tag_names(&[String::new()]).is_err());
    }

    #[test]
    fn test_user_name_pattern() {
        assert!(USER_NAME_PATTERN.is_match("jane.doe_01-x"));
        assert!(!USER_NAME_PATTERN.is_match("jd"));
        assert!(!USER_NAME_PATTERN.is_match("jane doe"));
        assert!(!USER_NAME_PATTERN.is_match(&"a".repeat(51)));
    }

    #[test]
    fn test_list_query_ranges() {
        let query = PostListQuery {
            page_number: Some(0),
            page_size: Some(101),
            ..Default::default()
        };
        assert_eq!(query.validate().unwrap_err().field_errors().len(), 2);
        assert!(PostListQuery::default().validate().is_ok());
    }
}
