//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::DbConn;

use quill_core::ports::{AdminAuthenticator, CategoryRepository, CommentRepository, PostRepository};
use quill_infra::{
    SeaCategoryRepository, SeaCommentRepository, SeaPostRepository, StaticTokenAuthenticator,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub auth: Arc<dyn AdminAuthenticator>,
    /// Kept for health probes; handlers go through the repositories.
    pub db: Arc<DbConn>,
    pub max_page_limit: u64,
}

impl AppState {
    /// Wire the SeaORM repositories and the admin token check around one pool.
    pub fn new(db: DbConn, admin_token: impl Into<String>, max_page_limit: u64) -> Self {
        let db = Arc::new(db);
        let state = Self {
            posts: Arc::new(SeaPostRepository::new(Arc::clone(&db))),
            categories: Arc::new(SeaCategoryRepository::new(Arc::clone(&db))),
            comments: Arc::new(SeaCommentRepository::new(Arc::clone(&db))),
            auth: Arc::new(StaticTokenAuthenticator::new(admin_token)),
            db,
            max_page_limit,
        };

        tracing::info!(max_page_limit, "Application state initialized");
        state
    }
}
