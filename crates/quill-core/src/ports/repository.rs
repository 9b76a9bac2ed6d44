use async_trait::async_trait;

use crate::domain::{
    Category, CategoryPatch, CategoryWithCount, Comment, CommentStatus, NewCategory, NewComment,
    NewPost, Post, PostPatch,
};
use crate::error::RepoError;
use crate::listing::{CommentFilter, Page, PageRequest, PostFilter};

/// Generic repository trait for lookups and deletes by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] if no
    /// row was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
///
/// Posts returned from here carry their category's name and slug. Deleting a
/// post also removes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// One page of posts matching `filter`, newest publication first, plus
    /// the total number of matches.
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply a partial update. Fails with [`RepoError::NotFound`] if the post
    /// does not exist.
    async fn update(&self, id: i32, patch: PostPatch) -> Result<Post, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    /// All categories ordered by name, each with its published post count.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    async fn create(&self, category: NewCategory) -> Result<Category, RepoError>;

    async fn update(&self, id: i32, patch: CategoryPatch) -> Result<Category, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// One page of comments matching `filter`, oldest first.
    async fn list(
        &self,
        filter: &CommentFilter,
        page: PageRequest,
    ) -> Result<Page<Comment>, RepoError>;

    /// Every approved comment on a post, oldest first.
    async fn approved_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Move a comment to `status`. Fails with [`RepoError::NotFound`] if the
    /// comment does not exist.
    async fn set_status(&self, id: i32, status: CommentStatus) -> Result<Comment, RepoError>;
}
