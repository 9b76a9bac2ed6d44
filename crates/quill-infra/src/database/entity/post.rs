//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;

use quill_core::domain::Post;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    pub author: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub featured_image: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub category_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub published_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build a domain Post from a post row and its (optional) category row.
pub(crate) fn into_post((model, category): (Model, Option<super::category::Model>)) -> Post {
    let (category_name, category_slug) = match category {
        Some(category) => (Some(category.name), Some(category.slug)),
        None => (None, None),
    };
    Post {
        id: model.id,
        title: model.title,
        slug: model.slug,
        content: model.content,
        excerpt: model.excerpt,
        author: model.author,
        // The column carries a CHECK constraint, so parsing cannot fail
        // on rows written through this schema.
        status: model.status.parse().unwrap_or_default(),
        featured_image: model.featured_image,
        tags: model.tags,
        category_id: model.category_id,
        category_name,
        category_slug,
        created_at: model.created_at,
        updated_at: model.updated_at,
        published_at: model.published_at,
    }
}
