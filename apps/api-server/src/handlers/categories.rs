//! Category handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use quill_core::ports::{BaseRepository, CategoryRepository};
use quill_shared::dto::{CreateCategoryRequest, UpdateCategoryRequest};
use quill_shared::response::{CategoryBody, CategoryListBody, MessageBody};

use crate::middleware::auth::Admin;
use crate::middleware::error::{AppResult, Resource};
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state
        .categories
        .list_with_counts()
        .await
        .map_err(|e| Resource::CATEGORY.error(e))?;

    Ok(HttpResponse::Ok().json(CategoryListBody { categories }))
}

/// POST /api/admin/categories
pub async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let category = state
        .categories
        .create(req.into_new_category()?)
        .await
        .map_err(|e| Resource::CATEGORY.error(e))?;

    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok(HttpResponse::Created().json(CategoryBody { category }))
}

/// PUT /api/admin/categories/{id}
pub async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let category = state
        .categories
        .update(path.into_inner(), req.into_patch()?)
        .await
        .map_err(|e| Resource::CATEGORY.error(e))?;

    Ok(HttpResponse::Ok().json(CategoryBody { category }))
}

/// DELETE /api/admin/categories/{id}
///
/// Posts filed under the category stay, with no category.
pub async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .categories
        .delete(id)
        .await
        .map_err(|e| Resource::CATEGORY.error(e))?;

    tracing::info!(category_id = id, "Category deleted");
    Ok(HttpResponse::Ok().json(MessageBody::new("Category deleted")))
}
