//! # Quill Core
//!
//! The domain layer of the Quill blog API.
//! This crate contains the blog entities, slug and pagination rules, and the
//! ports that infrastructure implements. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod listing;
pub mod ports;
pub mod slug;

pub use error::{DomainError, RepoError};
pub use listing::{CommentFilter, Page, PageRequest, PostFilter};
