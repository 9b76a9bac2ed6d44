//! Database connection management and SeaORM repositories.

mod connections;
mod error;
mod sea_base;
mod sea_repo;

pub mod entity;
pub mod query;

pub use connections::{DatabaseConfig, connect};
pub use sea_base::SeaBaseRepository;
pub use sea_repo::{SeaCategoryRepository, SeaCommentRepository, SeaPostRepository};
