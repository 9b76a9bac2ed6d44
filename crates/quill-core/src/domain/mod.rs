//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;

pub use category::{Category, CategoryPatch, CategoryWithCount, NewCategory};
pub use comment::{Comment, CommentStatus, NewComment};
pub use post::{EXCERPT_LENGTH, NewPost, Post, PostPatch, PostStatus, derive_excerpt};
