//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use pancake_core::domain::{Post, PostRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content_raw: String,
    #[sea_orm(column_type = "Text")]
    pub content_html: String,
    pub page_image: String,
    pub meta_description: String,
    pub layout: String,
    pub is_draft: bool,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Post::from_record(PostRecord {
            id: model.id,
            title: model.title,
            subtitle: model.subtitle,
            slug: model.slug,
            content_raw: model.content_raw,
            content_html: model.content_html,
            page_image: model.page_image,
            meta_description: model.meta_description,
            layout: model.layout,
            is_draft: model.is_draft,
            published_at: model.published_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        let record = post.into_record();
        Self {
            id: Set(record.id),
            title: Set(record.title),
            subtitle: Set(record.subtitle),
            slug: Set(record.slug),
            content_raw: Set(record.content_raw),
            content_html: Set(record.content_html),
            page_image: Set(record.page_image),
            meta_description: Set(record.meta_description),
            layout: Set(record.layout),
            is_draft: Set(record.is_draft),
            published_at: Set(record.published_at.map(Into::into)),
            created_at: Set(record.created_at.into()),
            updated_at: Set(record.updated_at.into()),
        }
    }
}
