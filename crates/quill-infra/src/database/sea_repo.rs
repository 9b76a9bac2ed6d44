//! SeaORM repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, IntoCondition};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, FromQueryResult, JoinType, NotSet,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use quill_core::domain::{
    Category, CategoryPatch, CategoryWithCount, Comment, CommentStatus, NewCategory, NewComment,
    NewPost, Post, PostPatch, PostStatus,
};
use quill_core::error::RepoError;
use quill_core::listing::{CommentFilter, Page, PageRequest, PostFilter};
use quill_core::ports::{BaseRepository, CategoryRepository, CommentRepository, PostRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity, into_post};
use super::error::repo_err;
use super::query;
use super::sea_base::SeaBaseRepository;

/// SeaORM category repository.
pub type SeaCategoryRepository = SeaBaseRepository<CategoryEntity>;

/// SeaORM comment repository.
pub type SeaCommentRepository = SeaBaseRepository<CommentEntity>;

/// SeaORM post repository. Every read joins the post's category.
pub struct SeaPostRepository {
    db: Arc<DbConn>,
}

impl SeaPostRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

fn total_rows(total: Option<i64>) -> u64 {
    total.and_then(|n| u64::try_from(n).ok()).unwrap_or(0)
}

#[async_trait]
impl BaseRepository<Post, i32> for SeaPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(row.map(into_post))
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(post_id = id, "Post deleted");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for SeaPostRepository {
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let rows = query::post_page_query(filter, page)
            .find_also_related(CategoryEntity)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        let total: Option<i64> = query::post_count_query(filter)
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        let items = rows.into_iter().map(into_post).collect();
        Ok(Page::new(items, page, total_rows(total)))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .find_also_related(CategoryEntity)
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(row.map(into_post))
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let published_at = new_post.published_at(now);

        let model = post::ActiveModel {
            id: NotSet,
            title: Set(new_post.title),
            slug: Set(new_post.slug),
            content: Set(new_post.content),
            excerpt: Set(new_post.excerpt),
            author: Set(new_post.author),
            status: Set(new_post.status.as_str().to_string()),
            featured_image: Set(new_post.featured_image),
            tags: Set(new_post.tags),
            category_id: Set(new_post.category_id),
            created_at: Set(now),
            updated_at: Set(now),
            published_at: Set(published_at),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(repo_err)?;

        tracing::debug!(post_id = model.id, slug = %model.slug, "Post created");

        self.find_by_id(model.id).await?.ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: i32, patch: PostPatch) -> Result<Post, RepoError> {
        let result = query::post_update_query(id, &patch, Utc::now())
            .exec(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }
}

/// Row shape of the category listing aggregate.
#[derive(Debug, FromQueryResult)]
struct CategoryCountRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    post_count: i64,
}

impl From<CategoryCountRow> for CategoryWithCount {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: Category {
                id: row.id,
                name: row.name,
                slug: row.slug,
                description: row.description,
                created_at: row.created_at,
            },
            post_count: u64::try_from(row.post_count).unwrap_or(0),
        }
    }
}

#[async_trait]
impl CategoryRepository for SeaCategoryRepository {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let published_posts = category::Relation::Posts
            .def()
            .on_condition(|_category, posts| {
                Expr::col((posts, post::Column::Status))
                    .eq(PostStatus::Published.as_str())
                    .into_condition()
            });

        let rows = CategoryEntity::find()
            .select_only()
            .columns([
                category::Column::Id,
                category::Column::Name,
                category::Column::Slug,
                category::Column::Description,
                category::Column::CreatedAt,
            ])
            .column_as(Expr::col((PostEntity, post::Column::Id)).count(), "post_count")
            .join(JoinType::LeftJoin, published_posts)
            .group_by(category::Column::Id)
            .group_by(category::Column::Name)
            .group_by(category::Column::Slug)
            .group_by(category::Column::Description)
            .group_by(category::Column::CreatedAt)
            .order_by_asc(category::Column::Name)
            .into_model::<CategoryCountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(new_category.name),
            slug: Set(new_category.slug),
            description: Set(new_category.description),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(repo_err)?;

        tracing::debug!(category_id = model.id, slug = %model.slug, "Category created");
        Ok(model.into())
    }

    async fn update(&self, id: i32, patch: CategoryPatch) -> Result<Category, RepoError> {
        if !patch.is_empty() {
            let mut update = CategoryEntity::update_many();
            if let Some(name) = patch.name {
                update = update.col_expr(category::Column::Name, Expr::value(name));
            }
            if let Some(slug) = patch.slug {
                update = update.col_expr(category::Column::Slug, Expr::value(slug));
            }
            if let Some(description) = patch.description {
                update = update.col_expr(category::Column::Description, Expr::value(description));
            }

            let result = update
                .filter(category::Column::Id.eq(id))
                .exec(self.db.as_ref())
                .await
                .map_err(repo_err)?;

            if result.rows_affected == 0 {
                return Err(RepoError::NotFound);
            }
        }

        BaseRepository::<Category, i32>::find_by_id(self, id)
            .await?
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for SeaCommentRepository {
    async fn list(
        &self,
        filter: &CommentFilter,
        page: PageRequest,
    ) -> Result<Page<Comment>, RepoError> {
        let rows = query::comment_page_query(filter, page)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        let total: Option<i64> = query::comment_count_query(filter)
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        let items = rows.into_iter().map(Comment::from).collect();
        Ok(Page::new(items, page, total_rows(total)))
    }

    async fn approved_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let filter = CommentFilter {
            post_id: Some(post_id),
            status: Some(CommentStatus::Approved),
        };

        let rows = query::ordered_comments(&filter)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new_comment.post_id),
            author_name: Set(new_comment.author_name),
            author_email: Set(new_comment.author_email),
            content: Set(new_comment.content),
            status: Set(CommentStatus::Pending.as_str().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(repo_err)?;

        tracing::debug!(comment_id = model.id, post_id = model.post_id, "Comment submitted");
        Ok(model.into())
    }

    async fn set_status(&self, id: i32, status: CommentStatus) -> Result<Comment, RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Status, Expr::value(status.as_str()))
            .filter(comment::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        BaseRepository::<Comment, i32>::find_by_id(self, id)
            .await?
            .ok_or(RepoError::NotFound)
    }
}
