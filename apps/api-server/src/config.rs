//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_infra::JwtConfig;
use blog_infra::database::DatabaseConfig;

use crate::background::PublisherConfig;

/// Credentials for the first administrator, created when no users exist.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub publisher: PublisherConfig,
    pub seed_admin: Option<SeedAdmin>,
}

pub(crate) fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

pub(crate) fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v != "false" && v != "0")
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parse_or("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parse_or("DB_MIN_CONNECTIONS", config.min_connections);
            config.sqlx_logging = flag("DB_SQL_LOGGING", false);
            config
        });

        let seed_admin = match (env::var("SEED_ADMIN_EMAIL"), env::var("SEED_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(SeedAdmin { email, password }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            jwt: JwtConfig::from_env(),
            publisher: PublisherConfig::from_env(),
            seed_admin,
        }
    }
}
