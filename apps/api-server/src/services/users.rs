//! User use cases: login, account creation and self-service profile.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use blog_core::domain::{NewUser, Policy, Role, User};
use blog_core::error::DomainError;
use blog_core::ports::{AuthError, PasswordService, TokenService, UserRepository};
use blog_infra::mask_email;
use blog_shared::dto::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, UpdateCurrentUserRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::validation;

/// Issued token plus the user it was issued for.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginOutcome> {
        validation::check(&req, |_| {})?;

        let Some(mut user) = self.users.find_by_email(&req.email).await? else {
            tracing::warn!(
                user_email = %mask_email(&req.email),
                "Login attempt for unknown email"
            );
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.passwords.verify(&req.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let now = Utc::now();
        user.last_login_at = Some(now);
        user.touch();
        let user = self.users.update(user).await?;

        let token = self
            .tokens
            .generate_token(user.id, &user.email, &user.user_name, &user.roles)?;
        let expires_in = self.tokens.expiration_seconds();

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            token,
            expires_in,
            expires_at: now + TimeDelta::seconds(expires_in),
            user,
        })
    }

    pub async fn create(&self, identity: &Identity, req: CreateUserRequest) -> AppResult<User> {
        identity.require(Policy::RequireAdmin)?;

        validation::check(&req, |errors| {
            validation::check_password(errors, "password", "Password", &req.password);
        })?;

        let mut roles = req
            .roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        if roles.is_empty() {
            roles.push(Role::User);
        }

        let profile = NewUser {
            user_name: req.user_name,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: non_blank(req.phone_number),
            roles,
        };
        let user = self.register(profile, &req.password).await?;
        tracing::info!(user_id = %user.id, created_by = %identity.user_id, "User created");
        Ok(user)
    }

    /// Hash the password and store a new user, rejecting taken emails and
    /// user names.
    pub(crate) async fn register(&self, profile: NewUser, password: &str) -> AppResult<User> {
        if self.users.find_by_email(&profile.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()).into());
        }
        if self
            .users
            .find_by_user_name(&profile.user_name)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("User name already taken".to_string()).into());
        }

        let password_hash = self.passwords.hash(password)?;
        Ok(self.users.insert(User::new(profile, password_hash)).await?)
    }

    pub async fn user_count(&self) -> AppResult<u64> {
        Ok(self.users.count().await?)
    }

    pub async fn current(&self, identity: &Identity) -> AppResult<User> {
        self.users.find_by_id(identity.user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %identity.user_id, "Token subject no longer exists");
            AppError::Unauthorized("The account for this token no longer exists.".to_string())
        })
    }

    /// Blank fields are left unchanged, except the phone number, which a
    /// blank value clears.
    pub async fn update_current(
        &self,
        identity: &Identity,
        req: UpdateCurrentUserRequest,
    ) -> AppResult<User> {
        identity.require(Policy::Authenticated)?;

        let req = UpdateCurrentUserRequest {
            first_name: non_blank(req.first_name),
            last_name: non_blank(req.last_name),
            email: non_blank(req.email),
            phone_number: req.phone_number,
        };
        validation::check(&req, |_| {})?;

        let mut user = self.current(identity).await?;

        if let Some(email) = req.email {
            if !email.eq_ignore_ascii_case(&user.email) {
                if let Some(other) = self.users.find_by_email(&email).await? {
                    if other.id != user.id {
                        return Err(
                            DomainError::Duplicate("Email already registered".to_string()).into(),
                        );
                    }
                }
            }
            user.email = email;
        }
        if let Some(first_name) = req.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = req.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = req.phone_number {
            user.phone_number = non_blank(Some(phone));
        }
        user.touch();

        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        identity: &Identity,
        req: ChangePasswordRequest,
    ) -> AppResult<()> {
        validation::check(&req, |errors| {
            validation::check_password(errors, "new_password", "New password", &req.new_password);
            if req.new_password != req.confirm_password {
                validation::reject(
                    errors,
                    "confirm_password",
                    "The new password and confirmation password do not match.",
                );
            }
        })?;

        let mut user = self.current(identity).await?;
        if !self
            .passwords
            .verify(&req.current_password, &user.password_hash)?
        {
            return Err(DomainError::InvalidArgument(
                "Current password is incorrect.".to_string(),
            )
            .into());
        }

        user.password_hash = self.passwords.hash(&req.new_password)?;
        user.touch();
        self.users.update(user).await?;

        tracing::info!(user_id = %identity.user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_infra::{Argon2PasswordService, InMemoryUserRepository, JwtConfig, JwtTokenService};
    use uuid::Uuid;

    const PASSWORD: &str = "Adm1n!pass";

    fn service() -> UserService {
        let tokens = JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        });
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(tokens),
        )
    }

    fn identity_of(user: &User) -> Identity {
        Identity {
            user_id: user.id,
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            roles: user.roles.clone(),
        }
    }

    async fn seed_admin(svc: &UserService) -> User {
        svc.register(
            NewUser {
                user_name: "admin".to_string(),
                email: "admin@example.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Admin".to_string(),
                phone_number: None,
                roles: vec![Role::Admin],
            },
            PASSWORD,
        )
        .await
        .unwrap()
    }

    fn create_request(user_name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            user_name: user_name.to_string(),
            email: email.to_string(),
            password: "Wr1ter!pass".to_string(),
            first_name: "Wendy".to_string(),
            last_name: "Writer".to_string(),
            phone_number: None,
            roles: vec!["Author".to_string()],
        }
    }

    #[tokio::test]
    async fn test_login_success_records_last_login() {
        let svc = service();
        let admin = seed_admin(&svc).await;

        let outcome = svc
            .login(LoginRequest {
                email: "admin@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.user.id, admin.id);
        assert!(outcome.user.last_login_at.is_some());
        assert_eq!(outcome.expires_in, 24 * 3600);

        let claims = svc.tokens.validate_token(&outcome.token).unwrap();
        assert_eq!(claims.roles, vec![Role::Admin]);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let svc = service();
        seed_admin(&svc).await;

        let wrong_password = svc
            .login(LoginRequest {
                email: "admin@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = svc
            .login(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_create_user() {
        let svc = service();
        let admin = identity_of(&seed_admin(&svc).await);

        let user = svc
            .create(&admin, create_request("wendy", "wendy@example.com"))
            .await
            .unwrap();
        assert_eq!(user.roles, vec![Role::Author]);
        assert_ne!(user.password_hash, "Wr1ter!pass");

        let err = svc
            .create(&admin, create_request("wendy2", "WENDY@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = svc
            .create(&admin, create_request("wendy", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let svc = service();
        let admin = identity_of(&seed_admin(&svc).await);

        let mut req = create_request("w", "not-an-email");
        req.password = "password".to_string();
        match svc.create(&admin, req).await.unwrap_err() {
            AppError::Validation(errors) => assert_eq!(errors.len(), 5),
            other => panic!("unexpected: {other:?}"),
        }

        let mut req = create_request("wendy", "wendy@example.com");
        req.roles = vec!["Superuser".to_string()];
        let err = svc.create(&admin, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let author = Identity {
            roles: vec![Role::Author],
            ..admin.clone()
        };
        let err = svc
            .create(&author, create_request("wendy", "wendy@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_current_user_missing_is_unauthorized() {
        let svc = service();
        let ghost = Identity {
            user_id: Uuid::new_v4(),
            email: "ghost@example.com".to_string(),
            user_name: "ghost".to_string(),
            roles: vec![],
        };

        assert!(matches!(
            svc.current(&ghost).await.unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn test_update_current_user() {
        let svc = service();
        let admin = seed_admin(&svc).await;
        let other = svc
            .register(
                NewUser {
                    user_name: "other".to_string(),
                    email: "other@example.com".to_string(),
                    first_name: "O".to_string(),
                    last_name: "Ther".to_string(),
                    phone_number: None,
                    roles: vec![Role::User],
                },
                PASSWORD,
            )
            .await
            .unwrap();
        let me = identity_of(&admin);

        let updated = svc
            .update_current(
                &me,
                UpdateCurrentUserRequest {
                    first_name: Some("Augusta".to_string()),
                    last_name: Some(String::new()),
                    email: None,
                    phone_number: Some("+1 555 0100".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.last_name, "Admin");
        assert_eq!(updated.phone_number.as_deref(), Some("+1 555 0100"));

        let err = svc
            .update_current(
                &me,
                UpdateCurrentUserRequest {
                    email: Some(other.email.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_change_password() {
        let svc = service();
        let me = identity_of(&seed_admin(&svc).await);

        let err = svc
            .change_password(
                &me,
                ChangePasswordRequest {
                    current_password: "Wr0ng!pass".to_string(),
                    new_password: "N3w!pass".to_string(),
                    confirm_password: "N3w!pass".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err = svc
            .change_password(
                &me,
                ChangePasswordRequest {
                    current_password: PASSWORD.to_string(),
                    new_password: "N3w!pass".to_string(),
                    confirm_password: "N3w!pasS".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        svc.change_password(
            &me,
            ChangePasswordRequest {
                current_password: PASSWORD.to_string(),
                new_password: "N3w!pass".to_string(),
                confirm_password: "N3w!pass".to_string(),
            },
        )
        .await
        .unwrap();

        let outcome = svc
            .login(LoginRequest {
                email: me.email.clone(),
                password: "N3w!pass".to_string(),
            })
            .await;
        assert!(outcome.is_ok());
    }
}
