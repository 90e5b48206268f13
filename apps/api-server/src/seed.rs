//! First-run data: the administrator account and default categories.

use blog_core::domain::{Category, NewUser, Role};
use blog_core::error::RepoError;
use blog_core::ports::CategoryRepository;
use blog_infra::mask_email;
use blog_shared::dto::USER_NAME_PATTERN;

use crate::config::SeedAdmin;
use crate::middleware::error::AppResult;
use crate::services::UserService;
use crate::validation;

/// Create the configured administrator when no users exist yet.
///
/// Returns whether an account was created.
pub async fn seed_admin(
    users: &UserService,
    existing_users: u64,
    seed: &SeedAdmin,
) -> AppResult<bool> {
    if existing_users > 0 {
        tracing::debug!(existing_users, "Users present, skipping admin seeding");
        return Ok(false);
    }

    let problems = validation::password_problems("Seed admin password", &seed.password);
    if !problems.is_empty() {
        tracing::warn!(?problems, "Seed admin password does not satisfy the password policy");
    }

    let user_name = seed
        .email
        .split_once('@')
        .map(|(local, _)| local)
        .filter(|local| USER_NAME_PATTERN.is_match(local))
        .unwrap_or("admin")
        .to_string();

    let profile = NewUser {
        user_name,
        email: seed.email.clone(),
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        phone_number: None,
        roles: vec![Role::Admin],
    };
    let user = users.register(profile, &seed.password).await?;

    tracing::info!(
        user_id = %user.id,
        user_email = %mask_email(&user.email),
        "Seeded administrator account"
    );
    Ok(true)
}

const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Technology", "Technology related articles and news"),
    ("Programming", "Programming tutorials and guides"),
    ("Web Development", "Web development articles and tutorials"),
    ("Mobile Development", "Mobile app development articles and tutorials"),
];

/// Create the default categories when none exist yet.
///
/// Returns how many were created.
pub async fn seed_categories(categories: &dyn CategoryRepository) -> Result<usize, RepoError> {
    let existing = categories.count().await?;
    if existing > 0 {
        tracing::debug!(existing, "Categories present, skipping category seeding");
        return Ok(0);
    }

    for (name, description) in DEFAULT_CATEGORIES {
        categories
            .insert(Category::new(name, Some(description.to_string())))
            .await?;
    }

    tracing::info!(count = DEFAULT_CATEGORIES.len(), "Seeded default categories");
    Ok(DEFAULT_CATEGORIES.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use blog_core::ports::{TokenService, UserRepository};
    use blog_infra::{
        Argon2PasswordService, InMemoryCategoryRepository, InMemoryUserRepository,
        JwtTokenService,
    };

    use super::*;

    #[tokio::test]
    async fn test_seed_only_into_empty_store() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(Default::default()));
        let users = UserService::new(repo.clone(), Arc::new(Argon2PasswordService::new()), tokens);
        let seed = SeedAdmin {
            email: "root@example.com".to_string(),
            password: "R00t!pass".to_string(),
        };

        assert!(seed_admin(&users, 0, &seed).await.unwrap());
        let admin = repo.find_by_email("root@example.com").await.unwrap().unwrap();
        assert_eq!(admin.user_name, "root");
        assert!(admin.has_role(Role::Admin));

        let count = repo.count().await.unwrap();
        assert!(!seed_admin(&users, count, &seed).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_categories_once() {
        let repo = InMemoryCategoryRepository::new();

        assert_eq!(seed_categories(&repo).await.unwrap(), 4);
        let web = repo.find_by_slug("web-development").await.unwrap().unwrap();
        assert_eq!(web.name, "Web Development");

        assert_eq!(seed_categories(&repo).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 4);
    }
}
