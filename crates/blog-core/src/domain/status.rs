use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    Draft,
    Published,
    Scheduled,
    Unpublished,
    Archived,
}

impl PostStatus {
    pub const ALL: [PostStatus; 5] = [
        PostStatus::Draft,
        PostStatus::Published,
        PostStatus::Scheduled,
        PostStatus::Unpublished,
        PostStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Published => "Published",
            PostStatus::Scheduled => "Scheduled",
            PostStatus::Unpublished => "Unpublished",
            PostStatus::Archived => "Archived",
        }
    }

    /// Statuses reachable from `self` in a single transition.
    pub fn allowed_transitions(&self) -> &'static [PostStatus] {
        match self {
            PostStatus::Draft => &[
                PostStatus::Published,
                PostStatus::Scheduled,
                PostStatus::Unpublished,
            ],
            PostStatus::Published => &[PostStatus::Unpublished, PostStatus::Archived],
            PostStatus::Scheduled => &[
                PostStatus::Draft,
                PostStatus::Published,
                PostStatus::Unpublished,
            ],
            PostStatus::Unpublished => &[
                PostStatus::Draft,
                PostStatus::Published,
                PostStatus::Scheduled,
            ],
            PostStatus::Archived => &[],
        }
    }

    /// Statuses a post may be created with.
    pub fn is_initial(&self) -> bool {
        matches!(
            self,
            PostStatus::Draft | PostStatus::Published | PostStatus::Scheduled
        )
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive parse. Anything that is not one of the five
/// status names is rejected; there is no default.
impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(PostStatus::Draft),
            "Published" => Ok(PostStatus::Published),
            "Scheduled" => Ok(PostStatus::Scheduled),
            "Unpublished" => Ok(PostStatus::Unpublished),
            "Archived" => Ok(PostStatus::Archived),
            other => Err(DomainError::InvalidArgument(format!(
                "Invalid status: '{}'. Expected one of: {}",
                other,
                join_statuses(&PostStatus::ALL)
            ))),
        }
    }
}

pub(crate) fn join_statuses(statuses: &[PostStatus]) -> String {
    statuses
        .iter()
        .map(PostStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for status in PostStatus::ALL {
            assert_eq!(status.as_str().parse::<PostStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive_and_fails_closed() {
        for input in ["draft", "PUBLISHED", "", " Draft", "1", "Bogus"] {
            let err = input.parse::<PostStatus>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(_)), "{input}");
        }
    }

    #[test]
    fn test_archived_has_no_transitions() {
        assert!(PostStatus::Archived.allowed_transitions().is_empty());
    }

    #[test]
    fn test_no_status_allows_itself() {
        for status in PostStatus::ALL {
            assert!(!status.allowed_transitions().contains(&status));
        }
    }
}
