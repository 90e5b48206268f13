//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_shared::PaginatedList;
use blog_shared::dto::{
    ChangePostStatusRequest, CreatePostRequest, CreatedResponse, PostListQuery, PostResponse,
    UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::services::{PostService, PostView};
use crate::state::AppState;

fn post_response(view: PostView) -> PostResponse {
    let PostView {
        post,
        author_name,
        category_name,
    } = view;

    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        summary: post.summary,
        status: post.status.to_string(),
        published_at: post.published_at,
        featured_image_url: post.featured_image_url,
        meta_title: post.meta_title,
        meta_description: post.meta_description,
        meta_keywords: post.meta_keywords,
        author_name,
        category_id: post.category_id,
        category_name,
        tags: post.tags.into_iter().map(|tag| tag.name).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let (filter, page) = PostService::list_params(&query)?;
    let result = state.post_service.list(&filter, page).await?;

    let items = result.items.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(PaginatedList::new(
        items,
        result.total,
        page.number,
        page.size,
    )))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.post_service.get(path.into_inner()).await?;
    let view = state.post_service.view(post).await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = state
        .post_service
        .create(&identity, body.into_inner())
        .await?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/posts/{}", id)))
        .json(CreatedResponse { id }))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .post_service
        .update(&identity, path.into_inner(), body.into_inner())
        .await?;
    let view = state.post_service.view(post).await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .post_service
        .delete(&identity, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/posts/{id}/status
pub async fn change_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ChangePostStatusRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .post_service
        .change_status(&identity, path.into_inner(), body.into_inner())
        .await?;
    let view = state.post_service.view(post).await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}
