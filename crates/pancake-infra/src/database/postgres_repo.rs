//! PostgreSQL repository implementations.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use pancake_core::domain::{AdjacentQuery, Direction, Post, Tag};
use pancake_core::error::RepoError;
use pancake_core::ports::{PostRepository, TagRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err, map_write_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

impl PostgresPostRepository {
    /// Build the post and tag repositories over one connection pool.
    pub fn pair(db: Arc<DbConn>) -> (PostgresPostRepository, PostgresTagRepository) {
        (
            PostgresPostRepository::new(Arc::clone(&db)),
            PostgresTagRepository::new(db),
        )
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .count(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug, "Finding post by slug");

        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new_post: Post) -> Result<Post, RepoError> {
        tracing::debug!(slug = %new_post.slug(), "Inserting post");

        let model = post::ActiveModel::from(new_post)
            .insert(self.conn())
            .await
            .map_err(map_write_err)?;

        Ok(model.into())
    }

    async fn tag_names(&self, post_id: Uuid) -> Result<BTreeSet<String>, RepoError> {
        let tags = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::PostTag.def())
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }

    async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        tracing::debug!(%post_id, count = tag_ids.len(), "Replacing post tags");

        // Dropping the transaction without commit rolls it back.
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        let mut stale = PostTagEntity::delete_many().filter(post_tag::Column::PostId.eq(post_id));
        if !tag_ids.is_empty() {
            stale = stale.filter(post_tag::Column::TagId.is_not_in(tag_ids.iter().copied()));
        }
        stale.exec(&txn).await.map_err(map_write_err)?;

        if !tag_ids.is_empty() {
            let rows = tag_ids.iter().map(|&tag_id| post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag_id),
            });
            PostTagEntity::insert_many(rows)
                .on_conflict(
                    OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(map_write_err)?;
        }

        txn.commit().await.map_err(map_db_err)
    }

    async fn find_adjacent(&self, query: &AdjacentQuery) -> Result<Option<Post>, RepoError> {
        let pivot: DateTimeWithTimeZone = query.pivot.into();
        let mut select = PostEntity::find().filter(post::Column::IsDraft.eq(false));

        select = match query.direction {
            Direction::Newer => {
                let mut newer = select.filter(post::Column::PublishedAt.gt(pivot));
                if let Some(limit) = query.not_after {
                    let limit: DateTimeWithTimeZone = limit.into();
                    newer = newer.filter(post::Column::PublishedAt.lte(limit));
                }
                newer
                    .order_by_asc(post::Column::PublishedAt)
                    .order_by_asc(post::Column::Id)
            }
            Direction::Older => select
                .filter(post::Column::PublishedAt.lt(pivot))
                .order_by_desc(post::Column::PublishedAt)
                .order_by_desc(post::Column::Id),
        };

        if let Some(name) = &query.tag {
            select = select
                .join(JoinType::InnerJoin, post::Relation::PostTag.def())
                .join(JoinType::InnerJoin, post_tag::Relation::Tag.def())
                .filter(tag::Column::Name.eq(name.as_str()));
        }

        let result = select.one(self.conn()).await.map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_names(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, RepoError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Name.is_in(names.iter().map(String::as_str)))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_tag: Tag) -> Result<Tag, RepoError> {
        tracing::debug!(tag = %new_tag.name, "Creating tag");

        let model = tag::ActiveModel::from(new_tag)
            .insert(self.conn())
            .await
            .map_err(map_write_err)?;

        Ok(model.into())
    }
}
