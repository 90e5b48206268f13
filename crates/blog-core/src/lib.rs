//! # Blog Core
//!
//! The domain layer of the blog CMS: posts and their taxonomy, users, the post status
//! lifecycle and the ports infrastructure must implement.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
