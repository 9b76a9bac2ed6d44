//! Comment handlers: public submission and listing, admin moderation.

use actix_web::{HttpResponse, web};
use validator::Validate;

use quill_core::domain::{Comment, CommentStatus, Post, PostStatus};
use quill_core::listing::{CommentFilter, DEFAULT_COMMENT_LIMIT};
use quill_core::ports::{BaseRepository, CommentRepository};
use quill_shared::dto::{
    CommentListQuery, CreateCommentRequest, PageQuery, UpdateCommentStatusRequest,
};
use quill_shared::response::{CommentBody, CommentListBody, MessageBody, PublicComment};

use crate::middleware::auth::Admin;
use crate::middleware::error::{AppResult, Resource};
use crate::state::AppState;

/// Comments are only visible on, and accepted for, published posts.
async fn published_post(state: &AppState, post_id: i32) -> AppResult<Post> {
    state
        .posts
        .find_by_id(post_id)
        .await
        .map_err(|e| Resource::POST.error(e))?
        .filter(|post| post.status == PostStatus::Published)
        .ok_or_else(|| Resource::POST.not_found())
}

/// GET /api/posts/{post_id}/comments
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, path.into_inner()).await?;

    let filter = CommentFilter {
        post_id: Some(post.id),
        status: Some(CommentStatus::Approved),
    };
    let page = query.page_request(DEFAULT_COMMENT_LIMIT, state.max_page_limit);

    let comments = state
        .comments
        .list(&filter, page)
        .await
        .map_err(|e| Resource::COMMENT.error(e))?;

    Ok(HttpResponse::Ok().json(CommentListBody::<PublicComment>::from(comments)))
}

/// POST /api/posts/{post_id}/comments
///
/// New comments wait in the moderation queue as `pending`.
pub async fn create_for_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let post_id = path.into_inner();
    let new_comment = req.into_new_comment(post_id)?;
    published_post(&state, post_id).await?;

    let comment = state
        .comments
        .create(new_comment)
        .await
        .map_err(|e| Resource::COMMENT.error(e))?;

    tracing::info!(comment_id = comment.id, post_id, "Comment submitted for moderation");
    Ok(HttpResponse::Created().json(CommentBody {
        comment: PublicComment::from(comment),
    }))
}

/// GET /api/admin/comments
pub async fn moderation_queue(
    _admin: Admin,
    state: web::Data<AppState>,
    query: web::Query<CommentListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.filter()?;
    let page = query.page_request(DEFAULT_COMMENT_LIMIT, state.max_page_limit);

    let comments = state
        .comments
        .list(&filter, page)
        .await
        .map_err(|e| Resource::COMMENT.error(e))?;

    Ok(HttpResponse::Ok().json(CommentListBody::<Comment>::from(comments)))
}

/// PUT /api/admin/comments/{id}/status
pub async fn update_status(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateCommentStatusRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let comment = state
        .comments
        .set_status(path.into_inner(), req.status()?)
        .await
        .map_err(|e| Resource::COMMENT.error(e))?;

    tracing::info!(comment_id = comment.id, status = %comment.status, "Comment moderated");
    Ok(HttpResponse::Ok().json(CommentBody { comment }))
}

/// DELETE /api/admin/comments/{id}
pub async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .comments
        .delete(id)
        .await
        .map_err(|e| Resource::COMMENT.error(e))?;

    tracing::info!(comment_id = id, "Comment deleted");
    Ok(HttpResponse::Ok().json(MessageBody::new("Comment deleted")))
}
