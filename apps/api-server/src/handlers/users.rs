//! User handlers.

use actix_web::{HttpResponse, web};

use blog_core::domain::{Role, User};
use blog_shared::ApiResponse;
use blog_shared::dto::{
    ChangePasswordRequest, CreateUserRequest, UpdateCurrentUserRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        phone_number: user.phone_number,
        roles: user.roles.iter().map(Role::as_str).map(String::from).collect(),
        created_at: user.created_at,
        last_login_at: user.last_login_at,
    }
}

/// POST /api/users
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state.user_service.create(&identity, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user_response(user)))
}

/// GET /api/users/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.user_service.current(&identity).await?;
    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// PUT /api/users/me
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateCurrentUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .user_service
        .update_current(&identity, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// POST /api/users/me/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .user_service
        .change_password(&identity, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Password changed.")))
}
