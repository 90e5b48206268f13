//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{
    DatabaseConfig, InMemoryCategoryRepository, InMemoryPostRepository, InMemoryTagRepository,
    InMemoryUserRepository, mask_email,
};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository, connect,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
