use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::slug::require_slug;

/// Number of content characters kept when an excerpt is derived.
pub const EXCERPT_LENGTH: usize = 200;

/// Post visibility state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub const ALL: [PostStatus; 2] = [PostStatus::Draft, PostStatus::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation("status", "must be one of: draft, published"))
    }
}

/// Post entity - a blog article, optionally filed under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    /// Comma-separated tag list, stored as given.
    pub tags: Option<String>,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Excerpt used when a post is created without one: the first
/// [`EXCERPT_LENGTH`] characters of the content, with an ellipsis if cut.
pub fn derive_excerpt(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(EXCERPT_LENGTH) {
        Some((cut, _)) => format!("{}...", content[..cut].trim_end()),
        None => content.to_string(),
    }
}

/// A post ready to be inserted. Slug and excerpt are already derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub tags: Option<String>,
    pub category_id: Option<i32>,
}

impl NewPost {
    /// Create a draft post, deriving the slug from the title and the excerpt
    /// from the content.
    pub fn new(title: String, content: String, author: String) -> Result<Self, DomainError> {
        let slug = require_slug("title", &title)?;
        let excerpt = derive_excerpt(&content);
        Ok(Self {
            title,
            slug,
            content,
            excerpt,
            author,
            status: PostStatus::Draft,
            featured_image: None,
            tags: None,
            category_id: None,
        })
    }

    /// Use an explicit excerpt. Absent or empty keeps the derived one.
    pub fn with_excerpt(mut self, excerpt: Option<String>) -> Self {
        if let Some(excerpt) = excerpt.filter(|e| !e.is_empty()) {
            self.excerpt = excerpt;
        }
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_featured_image(mut self, featured_image: Option<String>) -> Self {
        self.featured_image = featured_image;
        self
    }

    pub fn with_tags(mut self, tags: Option<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_category(mut self, category_id: Option<i32>) -> Self {
        self.category_id = category_id;
        self
    }

    /// `published_at` to store when this post is inserted at `now`.
    pub fn published_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (self.status == PostStatus::Published).then_some(now)
    }
}

/// Partial update of a post. `None` leaves the column untouched; for the
/// nullable columns `Some(None)` clears the value.
///
/// `slug` is never supplied by clients; [`PostPatch::derive_slug`] fills it
/// from `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub status: Option<PostStatus>,
    pub featured_image: Option<Option<String>>,
    pub tags: Option<Option<String>>,
    pub category_id: Option<Option<i32>>,
}

impl PostPatch {
    pub fn derive_slug(mut self) -> Result<Self, DomainError> {
        self.slug = self
            .title
            .as_deref()
            .map(|title| require_slug("title", title))
            .transpose()?;
        Ok(self)
    }

    /// Whether applying this patch stamps `published_at` with the current time.
    ///
    /// Any update that sets the status to published re-stamps, even when the
    /// post was already published.
    pub fn stamps_published_at(&self) -> bool {
        self.status == Some(PostStatus::Published)
    }
}
