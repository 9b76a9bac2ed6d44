//! Post handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use quill_core::listing::DEFAULT_POST_LIMIT;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository};
use quill_shared::dto::{CreatePostRequest, PostDetailQuery, PostListQuery, UpdatePostRequest};
use quill_shared::response::{MessageBody, PostBody, PostListBody, PublicComment};

use crate::middleware::auth::Admin;
use crate::middleware::error::{AppResult, Resource};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_published(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.public_filter();
    let page = query.page_request(DEFAULT_POST_LIMIT, state.max_page_limit);

    let posts = state
        .posts
        .list(&filter, page)
        .await
        .map_err(|e| Resource::POST.error(e))?;

    Ok(HttpResponse::Ok().json(PostListBody::from(posts)))
}

/// GET /api/posts/{slug}
pub async fn get_published(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PostDetailQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let post = state
        .posts
        .find_published_by_slug(&slug)
        .await
        .map_err(|e| Resource::POST.error(e))?
        .ok_or_else(|| Resource::POST.not_found())?;

    let mut body = PostBody::new(post);
    if query.include_comments {
        let comments = state
            .comments
            .approved_for_post(body.post.id)
            .await
            .map_err(|e| Resource::COMMENT.error(e))?;
        body = body.with_comments(comments.into_iter().map(PublicComment::from).collect());
    }

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/admin/posts
pub async fn list_all(
    _admin: Admin,
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.admin_filter()?;
    let page = query.page_request(DEFAULT_POST_LIMIT, state.max_page_limit);

    let posts = state
        .posts
        .list(&filter, page)
        .await
        .map_err(|e| Resource::POST.error(e))?;

    Ok(HttpResponse::Ok().json(PostListBody::from(posts)))
}

/// GET /api/admin/posts/{id}
pub async fn get_by_id(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(path.into_inner())
        .await
        .map_err(|e| Resource::POST.error(e))?
        .ok_or_else(|| Resource::POST.not_found())?;

    Ok(HttpResponse::Ok().json(PostBody::new(post)))
}

/// POST /api/admin/posts
pub async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let post = state
        .posts
        .create(req.into_new_post()?)
        .await
        .map_err(|e| Resource::POST.error(e))?;

    tracing::info!(post_id = post.id, slug = %post.slug, status = %post.status, "Post created");
    Ok(HttpResponse::Created().json(PostBody::new(post)))
}

/// PUT /api/admin/posts/{id}
pub async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let post = state
        .posts
        .update(path.into_inner(), req.into_patch()?)
        .await
        .map_err(|e| Resource::POST.error(e))?;

    tracing::info!(post_id = post.id, slug = %post.slug, "Post updated");
    Ok(HttpResponse::Ok().json(PostBody::new(post)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .posts
        .delete(id)
        .await
        .map_err(|e| Resource::POST.error(e))?;

    tracing::info!(post_id = id, "Post deleted");
    Ok(HttpResponse::Ok().json(MessageBody::new("Post deleted")))
}
