use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::slug::require_slug;

/// Category entity - a named bucket posts can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A category together with the number of published posts filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub post_count: u64,
}

/// A category ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: String, description: Option<String>) -> Result<Self, DomainError> {
        let slug = require_slug("name", &name)?;
        Ok(Self {
            name,
            slug,
            description,
        })
    }
}

/// Partial update of a category. Renaming also recomputes the slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn new(name: Option<String>, description: Option<String>) -> Result<Self, DomainError> {
        let slug = name
            .as_deref()
            .map(|name| require_slug("name", name))
            .transpose()?;
        Ok(Self {
            name,
            slug,
            description,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
