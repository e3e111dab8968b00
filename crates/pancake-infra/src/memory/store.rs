//! In-memory blog store implementing both the post and tag repositories.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pancake_core::domain::{AdjacentQuery, Post, Tag};
use pancake_core::error::RepoError;
use pancake_core::ports::{BaseRepository, PostRepository, TagRepository};

#[derive(Default)]
struct BlogState {
    posts: HashMap<Uuid, Post>,
    tags: HashMap<Uuid, Tag>,
    /// (post_id, tag_id) pivot rows.
    post_tags: BTreeSet<(Uuid, Uuid)>,
}

impl BlogState {
    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.posts
            .values()
            .any(|post| post.slug() == slug && Some(post.id()) != except)
    }

    fn tag_named(&self, name: &str) -> Option<&Tag> {
        self.tags.values().find(|tag| tag.name == name)
    }
}

/// Posts, tags and their associations behind one async RwLock.
///
/// Enforces the same unique constraints as the database schema: post slugs and
/// tag names. Every write takes the write lock once, so readers never see a
/// half-applied change. Data is lost on process restart.
pub struct InMemoryBlogStore {
    state: RwLock<BlogState>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BlogState::default()),
        }
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post.id()) {
            return Err(RepoError::NotFound);
        }
        if state.slug_taken(post.slug(), Some(post.id())) {
            return Err(RepoError::Conflict(format!("slug '{}'", post.slug())));
        }

        state.posts.insert(post.id(), post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        state.post_tags.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let state = self.state.read().await;
        Ok(state.slug_taken(slug, None))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.values().find(|post| post.slug() == slug).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        if state.posts.contains_key(&post.id()) {
            return Err(RepoError::Conflict(format!("post id {}", post.id())));
        }
        if state.slug_taken(post.slug(), None) {
            return Err(RepoError::Conflict(format!("slug '{}'", post.slug())));
        }

        state.posts.insert(post.id(), post.clone());
        Ok(post)
    }

    async fn tag_names(&self, post_id: Uuid) -> Result<BTreeSet<String>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .post_tags
            .range((post_id, Uuid::nil())..=(post_id, Uuid::from_u128(u128::MAX)))
            .filter_map(|(_, tag_id)| state.tags.get(tag_id))
            .map(|tag| tag.name.clone())
            .collect())
    }

    async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint(format!("unknown post {post_id}")));
        }
        if let Some(missing) = tag_ids.iter().find(|id| !state.tags.contains_key(*id)) {
            return Err(RepoError::Constraint(format!("unknown tag {missing}")));
        }

        let desired: BTreeSet<Uuid> = tag_ids.iter().copied().collect();
        state
            .post_tags
            .retain(|(owner, tag_id)| *owner != post_id || desired.contains(tag_id));
        state
            .post_tags
            .extend(desired.into_iter().map(|tag_id| (post_id, tag_id)));
        Ok(())
    }

    async fn find_adjacent(&self, query: &AdjacentQuery) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;

        let tag_id = match &query.tag {
            Some(name) => match state.tag_named(name) {
                Some(tag) => Some(tag.id),
                None => return Ok(None),
            },
            None => None,
        };

        let candidates = state.posts.values().filter(|post| {
            tag_id.is_none_or(|tag_id| state.post_tags.contains(&(post.id(), tag_id)))
        });
        Ok(query.closest(candidates).cloned())
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        let state = self.state.read().await;
        Ok(state.tags.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut state = self.state.write().await;
        if !state.tags.contains_key(&tag.id) {
            return Err(RepoError::NotFound);
        }
        if state
            .tag_named(&tag.name)
            .is_some_and(|existing| existing.id != tag.id)
        {
            return Err(RepoError::Conflict(format!("tag '{}'", tag.name)));
        }

        state.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        state.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let state = self.state.read().await;
        Ok(state.tag_named(name).cloned())
    }

    async fn find_by_names(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .tags
            .values()
            .filter(|tag| names.contains(&tag.name))
            .cloned()
            .collect())
    }

    async fn create(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut state = self.state.write().await;
        if state.tag_named(&tag.name).is_some() {
            return Err(RepoError::Conflict(format!("tag '{}'", tag.name)));
        }

        state.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pancake_core::domain::{Direction, NewPost};
    use pancake_core::ports::{ContentRenderer, RenderError};

    struct PlainRenderer;

    impl ContentRenderer for PlainRenderer {
        fn render(&self, raw: &str) -> Result<String, RenderError> {
            Ok(raw.to_string())
        }
    }

    fn new_post(title: &str, slug: &str) -> Post {
        let published = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        Post::new(
            NewPost::new(title, "body").published_at(published),
            slug.to_string(),
            &PlainRenderer,
            published,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_slug() {
        let store = InMemoryBlogStore::new();
        store.insert(new_post("One", "same")).await.unwrap();

        let result = store.insert(new_post("Two", "same")).await;
        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert!(store.slug_exists("same").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_tag_name() {
        let store = InMemoryBlogStore::new();
        store.create(Tag::new("rust")).await.unwrap();

        let result = store.create(Tag::new("rust")).await;
        assert!(matches!(result, Err(RepoError::Conflict(_))));
        // Names are case-sensitive.
        store.create(Tag::new("Rust")).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_tags_requires_known_tags() {
        let store = InMemoryBlogStore::new();
        let post = store.insert(new_post("One", "one")).await.unwrap();

        let result = store.replace_tags(post.id(), &[Uuid::new_v4()]).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert!(store.tag_names(post.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_post_drops_associations() {
        let store = InMemoryBlogStore::new();
        let post = store.insert(new_post("One", "one")).await.unwrap();
        let tag = store.create(Tag::new("rust")).await.unwrap();
        store.replace_tags(post.id(), &[tag.id]).await.unwrap();

        BaseRepository::<Post, Uuid>::delete(&store, post.id())
            .await
            .unwrap();

        assert!(store.tag_names(post.id()).await.unwrap().is_empty());
        assert!(store.find_by_name("rust").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_filter_tag_finds_nothing() {
        let store = InMemoryBlogStore::new();
        let first = store.insert(new_post("One", "one")).await.unwrap();
        let query = AdjacentQuery {
            direction: Direction::Newer,
            pivot: first.published_at().unwrap() - chrono::Duration::days(1),
            not_after: None,
            tag: Some("missing".to_string()),
        };

        assert!(store.find_adjacent(&query).await.unwrap().is_none());
    }
}
