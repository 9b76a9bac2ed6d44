//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`: SeaORM
//! repositories over SQLite or PostgreSQL, the list query builder, and the
//! static admin token authenticator.

pub mod auth;
pub mod database;

pub use auth::StaticTokenAuthenticator;
pub use database::{
    DatabaseConfig, SeaCategoryRepository, SeaCommentRepository, SeaPostRepository, connect,
};
