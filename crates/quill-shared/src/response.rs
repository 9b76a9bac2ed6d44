//! Response envelopes. Every body names its resource (`post`, `posts`, ...)
//! and list bodies carry a `pagination` block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use quill_core::domain::{Category, CategoryWithCount, Comment, CommentStatus, Post};
use quill_core::listing::{Page, Pagination};

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flatten validator output into one violation per failed rule, ordered
    /// by field name.
    pub fn from_errors(errors: &ValidationErrors) -> Vec<Self> {
        let mut violations: Vec<Self> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code));
                    Self::new(field.to_string(), message)
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        violations
    }
}

/// Error body: `{ "error": "...", "details": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<FieldViolation>) -> Self {
        self.details = Some(details);
        self
    }
}

/// A comment as shown to the public: the author's email is withheld.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicComment {
    pub id: i32,
    pub post_id: i32,
    pub author_name: String,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for PublicComment {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_name: comment.author_name,
            content: comment.content,
            status: comment.status,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBody {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<PublicComment>>,
}

impl PostBody {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: Vec<PublicComment>) -> Self {
        self.comments = Some(comments);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListBody {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

impl From<Page<Post>> for PostListBody {
    fn from(page: Page<Post>) -> Self {
        Self {
            pagination: page.pagination(),
            posts: page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBody {
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListBody {
    pub categories: Vec<CategoryWithCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentBody<C = Comment> {
    pub comment: C,
}

/// A page of comments. Public listings use [`PublicComment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListBody<C = Comment> {
    pub comments: Vec<C>,
    pub pagination: Pagination,
}

impl<C: From<Comment>> From<Page<Comment>> for CommentListBody<C> {
    fn from(page: Page<Comment>) -> Self {
        let page = page.map(C::from);
        Self {
            pagination: page.pagination(),
            comments: page.items,
        }
    }
}

/// Acknowledgement body for deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
