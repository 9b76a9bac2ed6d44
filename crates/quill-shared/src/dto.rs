//! Data Transfer Objects - request payloads and query parameters.
//!
//! Required string fields default to empty when absent so that a missing
//! field is reported by validation like any other violation.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use quill_core::domain::{
    CategoryPatch, CommentStatus, NewCategory, NewComment, NewPost, PostPatch, PostStatus,
};
use quill_core::error::DomainError;
use quill_core::listing::{CommentFilter, PageRequest, PostFilter};

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn post_status(status: &str) -> Result<(), ValidationError> {
    status
        .parse::<PostStatus>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("status").with_message("must be one of: draft, published".into()))
}

fn comment_status(status: &str) -> Result<(), ValidationError> {
    status.parse::<CommentStatus>().map(|_| ()).map_err(|_| {
        ValidationError::new("status")
            .with_message("must be one of: pending, approved, rejected".into())
    })
}

fn parse_status<S>(status: Option<&str>) -> Result<Option<S>, DomainError>
where
    S: std::str::FromStr<Err = DomainError>,
{
    status.map(str::parse).transpose()
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: String,

    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub excerpt: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub author: String,

    #[validate(custom(function = "post_status"))]
    pub status: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    pub featured_image: Option<String>,

    pub tags: Option<String>,

    pub category_id: Option<i32>,
}

impl CreatePostRequest {
    /// Turn a validated request into an insertable post.
    pub fn into_new_post(self) -> Result<NewPost, DomainError> {
        let status = parse_status::<PostStatus>(self.status.as_deref())?.unwrap_or_default();

        Ok(NewPost::new(self.title, self.content, self.author)?
            .with_excerpt(self.excerpt)
            .with_status(status)
            .with_featured_image(self.featured_image)
            .with_tags(self.tags)
            .with_category(self.category_id))
    }
}

/// Partial update of a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: Option<String>,

    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub author: Option<String>,

    #[validate(custom(function = "post_status"))]
    pub status: Option<String>,

    /// `null` clears the image.
    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "must be a valid URL"))]
    pub featured_image: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub tags: Option<Option<String>>,

    /// `null` detaches the post from its category.
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<i32>>,
}

impl UpdatePostRequest {
    pub fn into_patch(self) -> Result<PostPatch, DomainError> {
        PostPatch {
            status: parse_status(self.status.as_deref())?,
            title: self.title,
            slug: None,
            content: self.content,
            excerpt: self.excerpt,
            author: self.author,
            featured_image: self.featured_image,
            tags: self.tags,
            category_id: self.category_id,
        }
        .derive_slug()
    }
}

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn into_new_category(self) -> Result<NewCategory, DomainError> {
        NewCategory::new(self.name, self.description)
    }
}

/// Request to rename or redescribe a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn into_patch(self) -> Result<CategoryPatch, DomainError> {
        CategoryPatch::new(self.name, self.description)
    }
}

/// Request to submit a comment on a post.
///
/// The post is identified by the request path; `post_id` in the body is
/// optional and must agree with it when present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub author_name: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub author_email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 1000, message = "must be 1-1000 characters"))]
    pub content: String,
}

impl CreateCommentRequest {
    pub fn into_new_comment(self, post_id: i32) -> Result<NewComment, DomainError> {
        if self.post_id.is_some_and(|id| id != post_id) {
            return Err(DomainError::validation(
                "post_id",
                "does not match the post in the request path",
            ));
        }

        Ok(NewComment {
            post_id,
            author_name: self.author_name,
            author_email: self.author_email,
            content: self.content,
        })
    }
}

/// Moderation decision for a comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentStatusRequest {
    #[serde(default)]
    #[validate(custom(function = "comment_status"))]
    pub status: String,
}

impl UpdateCommentStatusRequest {
    pub fn status(&self) -> Result<CommentStatus, DomainError> {
        self.status.parse()
    }
}

/// Query parameters of the post listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl PostListQuery {
    pub fn page_request(&self, default_limit: u64, max_limit: u64) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit, max_limit)
    }

    /// Filter for the public listing. Any `status` parameter is ignored.
    pub fn public_filter(&self) -> PostFilter {
        PostFilter::published()
            .with_category(self.category.clone())
            .with_search(self.search.clone())
    }

    /// Filter for the admin listing, which may ask for any status.
    pub fn admin_filter(&self) -> Result<PostFilter, DomainError> {
        let status = parse_status(self.status.as_deref().filter(|s| !s.is_empty()))?;
        Ok(PostFilter {
            status,
            ..PostFilter::default()
        }
        .with_category(self.category.clone())
        .with_search(self.search.clone()))
    }
}

/// Query parameters of the admin moderation queue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Defaults to `pending`.
    pub status: Option<String>,
    pub post_id: Option<i32>,
}

impl CommentListQuery {
    pub fn page_request(&self, default_limit: u64, max_limit: u64) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit, max_limit)
    }

    pub fn filter(&self) -> Result<CommentFilter, DomainError> {
        let status = parse_status(self.status.as_deref().filter(|s| !s.is_empty()))?;
        Ok(CommentFilter {
            post_id: self.post_id,
            status: Some(status.unwrap_or(CommentStatus::Pending)),
        })
    }
}

/// Plain pagination parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn page_request(&self, default_limit: u64, max_limit: u64) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit, max_limit)
    }
}

/// Query parameters of the single post endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PostDetailQuery {
    #[serde(default)]
    pub include_comments: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_post(json: serde_json::Value) -> CreatePostRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn missing_required_fields_are_violations() {
        let req = create_post(serde_json::json!({ "content": "Body" }));
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("author"));
        assert!(!fields.contains_key("content"));
    }

    #[test]
    fn create_post_checks_status_and_image() {
        let req = create_post(serde_json::json!({
            "title": "Hello",
            "content": "Body",
            "author": "Ada",
            "status": "archived",
            "featured_image": "not a url",
        }));
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("status"));
        assert!(fields.contains_key("featured_image"));
    }

    #[test]
    fn valid_create_post_applies_defaults() {
        let req = create_post(serde_json::json!({
            "title": "Hello World",
            "content": "Body",
            "author": "Ada",
        }));
        assert!(req.validate().is_ok());

        let post = req.into_new_post().unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.excerpt, "Body");
    }

    #[test]
    fn title_over_limit_is_rejected() {
        let req = create_post(serde_json::json!({
            "title": "x".repeat(201),
            "content": "Body",
            "author": "Ada",
        }));
        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));
    }

    #[test]
    fn update_patch_derives_slug_and_status() {
        let req = UpdatePostRequest {
            title: Some("Renamed Post".into()),
            status: Some("published".into()),
            ..UpdatePostRequest::default()
        };
        assert!(req.validate().is_ok());

        let patch = req.into_patch().unwrap();
        assert_eq!(patch.slug.as_deref(), Some("renamed-post"));
        assert_eq!(patch.status, Some(PostStatus::Published));
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let req: UpdatePostRequest = serde_json::from_value(serde_json::json!({
            "category_id": null,
            "featured_image": "https://example.com/cover.png",
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let patch = req.into_patch().unwrap();
        assert_eq!(patch.category_id, Some(None));
        assert_eq!(
            patch.featured_image,
            Some(Some("https://example.com/cover.png".into()))
        );
        assert_eq!(patch.tags, None);

        let req: UpdatePostRequest =
            serde_json::from_value(serde_json::json!({ "featured_image": "not a url" })).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("featured_image"));
    }

    #[test]
    fn comment_requires_email_and_bounded_content() {
        let req: CreateCommentRequest = serde_json::from_value(serde_json::json!({
            "author_name": "Grace",
            "author_email": "nope",
            "content": "x".repeat(1001),
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("author_email"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn comment_body_post_id_must_match_path() {
        let req = CreateCommentRequest {
            post_id: Some(2),
            author_name: "Grace".into(),
            author_email: "grace@example.com".into(),
            content: "Hi".into(),
        };
        assert!(req.clone().into_new_comment(2).is_ok());

        let err = req.into_new_comment(3).unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "post_id", .. }));
    }

    #[test]
    fn moderation_status_is_required() {
        let req: UpdateCommentStatusRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());

        let req = UpdateCommentStatusRequest {
            status: "approved".into(),
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.status().unwrap(), CommentStatus::Approved);
    }

    #[test]
    fn public_filter_ignores_status() {
        let query = PostListQuery {
            status: Some("draft".into()),
            category: Some("rust".into()),
            search: Some("  ".into()),
            ..PostListQuery::default()
        };
        let filter = query.public_filter();
        assert_eq!(filter.status, Some(PostStatus::Published));
        assert_eq!(filter.category.as_deref(), Some("rust"));
        assert_eq!(filter.search, None);

        assert_eq!(query.admin_filter().unwrap().status, Some(PostStatus::Draft));
    }

    #[test]
    fn moderation_queue_defaults_to_pending() {
        let filter = CommentListQuery::default().filter().unwrap();
        assert_eq!(filter.status, Some(CommentStatus::Pending));

        let query = CommentListQuery {
            status: Some("spam".into()),
            ..CommentListQuery::default()
        };
        assert!(query.filter().is_err());
    }
}
