//! List and update statement builders.
//!
//! Every filter value is bound as a statement parameter; nothing supplied by
//! a client is spliced into SQL text. Filters are appended in a fixed order
//! (status, category, search), so identical inputs always produce identical
//! statements.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, NullOrdering, Order, Query};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, UpdateMany,
};

use quill_core::domain::PostPatch;
use quill_core::listing::{CommentFilter, PageRequest, PostFilter};

use super::entity::{category, comment, post};

/// Alias of the aggregate column produced by the count queries.
pub const COUNT_ALIAS: &str = "total";

/// Escape character for `LIKE` patterns built from search terms.
const LIKE_ESCAPE: char = '!';

/// `%term%` with `LIKE` wildcards in `term` escaped, so the term matches as a
/// literal substring.
///
/// The term is lowercased here with Unicode rules and compared against
/// `LOWER(column)`. PostgreSQL folds non-ASCII text the same way; SQLite's
/// `LOWER` only folds ASCII, so on SQLite non-ASCII letters match case-sensitively.
fn like_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Posts matching `filter`, without ordering or pagination.
pub fn filtered_posts(filter: &PostFilter) -> Select<post::Entity> {
    let mut select = post::Entity::find();

    if let Some(status) = filter.status {
        select = select.filter(post::Column::Status.eq(status.as_str()));
    }

    if let Some(slug) = filter.category.as_deref() {
        let category_ids = Query::select()
            .column(category::Column::Id)
            .from(category::Entity)
            .and_where(category::Column::Slug.eq(slug))
            .to_owned();
        select = select.filter(post::Column::CategoryId.in_subquery(category_ids));
    }

    if let Some(term) = filter.search.as_deref() {
        let pattern = like_pattern(term);
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Title))))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Content))))
                        .like(pattern),
                ),
        );
    }

    select
}

/// One page of posts: latest publication first, then latest creation, with
/// the id as a final tie-breaker. Unpublished rows sort after published ones.
pub fn post_page_query(filter: &PostFilter, page: PageRequest) -> Select<post::Entity> {
    filtered_posts(filter)
        .order_by_with_nulls(post::Column::PublishedAt, Order::Desc, NullOrdering::Last)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .limit(page.limit())
        .offset(page.offset())
}

/// `COUNT` over the same filters as [`post_page_query`], without ordering or
/// pagination.
pub fn post_count_query(filter: &PostFilter) -> Select<post::Entity> {
    filtered_posts(filter)
        .select_only()
        .column_as(Expr::col((post::Entity, post::Column::Id)).count(), COUNT_ALIAS)
}

/// Comments matching `filter`, without ordering or pagination.
pub fn filtered_comments(filter: &CommentFilter) -> Select<comment::Entity> {
    let mut select = comment::Entity::find();

    if let Some(post_id) = filter.post_id {
        select = select.filter(comment::Column::PostId.eq(post_id));
    }

    if let Some(status) = filter.status {
        select = select.filter(comment::Column::Status.eq(status.as_str()));
    }

    select
}

/// Comments matching `filter` in chronological order.
pub fn ordered_comments(filter: &CommentFilter) -> Select<comment::Entity> {
    filtered_comments(filter)
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
}

/// One page of comments in chronological order.
pub fn comment_page_query(filter: &CommentFilter, page: PageRequest) -> Select<comment::Entity> {
    ordered_comments(filter)
        .limit(page.limit())
        .offset(page.offset())
}

pub fn comment_count_query(filter: &CommentFilter) -> Select<comment::Entity> {
    filtered_comments(filter)
        .select_only()
        .column_as(
            Expr::col((comment::Entity, comment::Column::Id)).count(),
            COUNT_ALIAS,
        )
}

/// `UPDATE posts SET ...` for a partial patch.
///
/// Assignments follow the patch's field order. `updated_at` is always
/// refreshed, and publishing stamps `published_at` with `now`.
pub fn post_update_query(id: i32, patch: &PostPatch, now: DateTime<Utc>) -> UpdateMany<post::Entity> {
    let mut update = post::Entity::update_many();

    if let Some(title) = &patch.title {
        update = update.col_expr(post::Column::Title, Expr::value(title.clone()));
    }
    if let Some(slug) = &patch.slug {
        update = update.col_expr(post::Column::Slug, Expr::value(slug.clone()));
    }
    if let Some(content) = &patch.content {
        update = update.col_expr(post::Column::Content, Expr::value(content.clone()));
    }
    if let Some(excerpt) = &patch.excerpt {
        update = update.col_expr(post::Column::Excerpt, Expr::value(excerpt.clone()));
    }
    if let Some(author) = &patch.author {
        update = update.col_expr(post::Column::Author, Expr::value(author.clone()));
    }
    if let Some(status) = patch.status {
        update = update.col_expr(post::Column::Status, Expr::value(status.as_str()));
    }
    if patch.stamps_published_at() {
        update = update.col_expr(post::Column::PublishedAt, Expr::value(now));
    }
    if let Some(featured_image) = &patch.featured_image {
        update = update.col_expr(
            post::Column::FeaturedImage,
            Expr::value(featured_image.clone()),
        );
    }
    if let Some(tags) = &patch.tags {
        update = update.col_expr(post::Column::Tags, Expr::value(tags.clone()));
    }
    if let Some(category_id) = patch.category_id {
        update = update.col_expr(post::Column::CategoryId, Expr::value(category_id));
    }

    update
        .col_expr(post::Column::UpdatedAt, Expr::value(now))
        .filter(post::Column::Id.eq(id))
}
