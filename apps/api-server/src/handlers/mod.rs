//! HTTP handlers and route configuration.

mod categories;
mod comments;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult, json_config, path_config, query_config};

async fn route_not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Route not found".to_string()))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                // Public routes
                .route("/posts", web::get().to(posts::list_published))
                .route("/posts/{slug}", web::get().to(posts::get_published))
                .service(
                    web::resource("/posts/{post_id}/comments")
                        .route(web::get().to(comments::list_for_post))
                        .route(web::post().to(comments::create_for_post)),
                )
                .route("/categories", web::get().to(categories::list))
                // Admin routes, each gated by the `Admin` extractor
                .service(
                    web::scope("/admin")
                        .service(
                            web::resource("/posts")
                                .route(web::get().to(posts::list_all))
                                .route(web::post().to(posts::create)),
                        )
                        .service(
                            web::resource("/posts/{id}")
                                .route(web::get().to(posts::get_by_id))
                                .route(web::put().to(posts::update))
                                .route(web::delete().to(posts::delete)),
                        )
                        .route("/categories", web::post().to(categories::create))
                        .service(
                            web::resource("/categories/{id}")
                                .route(web::put().to(categories::update))
                                .route(web::delete().to(categories::delete)),
                        )
                        .route("/comments", web::get().to(comments::moderation_queue))
                        .route("/comments/{id}/status", web::put().to(comments::update_status))
                        .route("/comments/{id}", web::delete().to(comments::delete)),
                ),
        )
        .default_service(web::to(route_not_found));
}
