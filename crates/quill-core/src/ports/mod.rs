//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;

pub use auth::{AdminAuthenticator, AuthError};
pub use repository::{BaseRepository, CategoryRepository, CommentRepository, PostRepository};
