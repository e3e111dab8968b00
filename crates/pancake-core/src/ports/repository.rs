use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AdjacentQuery, Post, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save changes to an entity that is already stored.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository with slug, tag association and navigation queries.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Whether any post already owns `slug`.
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Store a new post. A taken slug yields [`RepoError::Conflict`].
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Names of the tags associated with a post.
    async fn tag_names(&self, post_id: Uuid) -> Result<BTreeSet<String>, RepoError>;

    /// Atomically make `tag_ids` the complete association set of a post.
    ///
    /// Associations already present are kept, missing ones are added and the
    /// rest removed. An empty slice detaches every tag.
    async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;

    /// Immediate neighbour described by `query`, see [`AdjacentQuery`].
    async fn find_adjacent(&self, query: &AdjacentQuery) -> Result<Option<Post>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    /// All tags whose name is in `names`, in no particular order.
    async fn find_by_names(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, RepoError>;

    /// Store a new tag. A taken name yields [`RepoError::Conflict`].
    async fn create(&self, tag: Tag) -> Result<Tag, RepoError>;
}
