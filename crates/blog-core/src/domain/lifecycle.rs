//! Post status lifecycle - the transition rules shared by the status
//! endpoint and the scheduled publisher.

use chrono::{DateTime, Utc};

use super::status::{PostStatus, join_statuses};
use crate::error::DomainError;

/// What an accepted transition does to `published_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedAtChange {
    /// Leave the stored value as it is.
    Keep,
    /// Overwrite with the given timestamp.
    Set(DateTime<Utc>),
}

/// An accepted status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: PostStatus,
    pub published_at: PublishedAtChange,
}

impl Transition {
    /// The `published_at` value after applying this transition to a post
    /// whose current value is `previous`.
    pub fn resolve_published_at(&self, previous: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        match self.published_at {
            PublishedAtChange::Keep => previous,
            PublishedAtChange::Set(at) => Some(at),
        }
    }
}

/// Validate a status change requested by name, using the current time for
/// `Published` transitions.
pub fn validate(
    current: PostStatus,
    requested: &str,
    publish_date: Option<DateTime<Utc>>,
) -> Result<Transition, DomainError> {
    validate_at(current, requested, publish_date, Utc::now())
}

/// Same as [`validate`] with an explicit `now`.
pub fn validate_at(
    current: PostStatus,
    requested: &str,
    publish_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    let requested: PostStatus = requested.parse()?;
    transition(current, requested, publish_date, now)
}

/// Decide whether `current -> requested` is legal and what it implies.
///
/// Rules are checked in order: archived posts are frozen, only published
/// posts may be archived, then the transition table, then the publish date
/// requirement for scheduling.
pub fn transition(
    current: PostStatus,
    requested: PostStatus,
    publish_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    if current == PostStatus::Archived {
        return Err(DomainError::InvalidOperation(
            "Archived posts cannot be modified.".to_string(),
        ));
    }

    if requested == PostStatus::Archived
        && matches!(current, PostStatus::Draft | PostStatus::Unpublished)
    {
        return Err(DomainError::InvalidOperation(
            "Only published posts can be archived.".to_string(),
        ));
    }

    let allowed = current.allowed_transitions();
    if !allowed.contains(&requested) {
        return Err(DomainError::InvalidOperation(format!(
            "{} posts can only be changed to {}.",
            current,
            join_statuses(allowed)
        )));
    }

    let published_at = match requested {
        PostStatus::Scheduled => match publish_date {
            Some(at) => PublishedAtChange::Set(at),
            None => {
                return Err(DomainError::InvalidArgument(
                    "Publish date is required for scheduled posts.".to_string(),
                ));
            }
        },
        PostStatus::Published => PublishedAtChange::Set(now),
        PostStatus::Draft | PostStatus::Unpublished | PostStatus::Archived => {
            PublishedAtChange::Keep
        }
    };

    Ok(Transition {
        status: requested,
        published_at,
    })
}
