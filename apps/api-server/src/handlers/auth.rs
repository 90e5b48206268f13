//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blog_shared::dto::{AuthResponse, LoginRequest};

use super::users::user_response;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state.user_service.login(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: outcome.expires_in.max(0) as u64,
        expires_at: outcome.expires_at,
        user: user_response(outcome.user),
    }))
}
