use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AdjacentQuery, NewPost, Post, PostDetails, Tag, generate_slug};
use crate::error::{DomainError, RepoError};
use crate::ports::{Clock, ContentRenderer, PostRepository, TagRepository};

use super::TagCatalog;

/// Tunables for [`PostService`].
#[derive(Debug, Clone)]
pub struct PostServiceConfig {
    /// How many times an insert rejected for a taken slug is retried with a
    /// freshly generated slug.
    pub slug_insert_attempts: u32,
}

impl Default for PostServiceConfig {
    fn default() -> Self {
        Self {
            slug_insert_attempts: 3,
        }
    }
}

/// Post operations: creation, edits, tag sync and navigation.
///
/// Every mutation is applied to a copy first and only written back to the
/// caller's [`Post`] once storage accepted it.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    catalog: TagCatalog,
    renderer: Arc<dyn ContentRenderer>,
    clock: Arc<dyn Clock>,
    config: PostServiceConfig,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        renderer: Arc<dyn ContentRenderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            catalog: TagCatalog::new(tags),
            renderer,
            clock,
            config: PostServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PostServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    /// Create and store a post with a unique slug and rendered content.
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, DomainError> {
        new_post.validate()?;

        let attempts = self.config.slug_insert_attempts.max(1);
        let slug = self.unique_slug(&new_post.title).await?;
        let mut post = Post::new(new_post, slug, self.renderer.as_ref(), self.clock.now())?;

        let mut attempt = 1;
        loop {
            match self.posts.insert(post.clone()).await {
                Ok(saved) => return Ok(saved),
                // Another writer took the slug between the check and the insert.
                Err(RepoError::Conflict(_)) if attempt < attempts => {
                    attempt += 1;
                    let slug = self.unique_slug(post.title()).await?;
                    post = post.with_slug(slug);
                }
                Err(RepoError::Conflict(_)) => {
                    return Err(DomainError::SlugCollisionRetryExhausted {
                        slug: post.slug().to_string(),
                        attempts,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id,
            })
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.find_by_slug(slug).await?)
    }

    /// Retitle a post. The slug is left alone.
    pub async fn update_title(
        &self,
        post: &mut Post,
        title: impl Into<String>,
    ) -> Result<(), DomainError> {
        let mut staged = post.clone();
        staged.set_title(title)?;
        self.persist(post, staged).await
    }

    /// Replace the raw content; the HTML is re-rendered in the same step.
    pub async fn update_content(
        &self,
        post: &mut Post,
        content_raw: impl Into<String>,
    ) -> Result<(), DomainError> {
        let mut staged = post.clone();
        staged.set_content(content_raw, self.renderer.as_ref())?;
        self.persist(post, staged).await
    }

    pub async fn update_details(
        &self,
        post: &mut Post,
        details: PostDetails,
    ) -> Result<(), DomainError> {
        let mut staged = post.clone();
        staged.set_details(details);
        self.persist(post, staged).await
    }

    /// Change the draft flag and publish time, which only affects navigation.
    pub async fn set_publication(
        &self,
        post: &mut Post,
        is_draft: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError> {
        let mut staged = post.clone();
        staged.set_publication(is_draft, published_at);
        self.persist(post, staged).await
    }

    /// Delete a post together with its tag associations.
    pub async fn delete_post(&self, post: Post) -> Result<(), DomainError> {
        self.posts
            .delete(post.id())
            .await
            .map_err(|e| missing_post(e, post.id()))
    }

    /// Make `names` the exact tag set of `post`, creating missing tags first.
    ///
    /// Duplicate names collapse; calling this twice with the same names is a
    /// no-op the second time.
    pub async fn sync_tags<I, S>(&self, post: &Post, names: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let desired: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        self.catalog.ensure_exist(&desired).await?;

        if desired.is_empty() {
            self.posts.replace_tags(post.id(), &[]).await?;
            return Ok(());
        }

        let tag_ids: Vec<Uuid> = self
            .catalog
            .resolve(&desired)
            .await?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        self.posts.replace_tags(post.id(), &tag_ids).await?;
        Ok(())
    }

    pub async fn tags_of(&self, post: &Post) -> Result<BTreeSet<String>, DomainError> {
        Ok(self.posts.tag_names(post.id()).await?)
    }

    /// The next published post after `post`, never one scheduled past now.
    pub async fn newer(&self, post: &Post, tag: Option<&Tag>) -> Result<Option<Post>, DomainError> {
        let Some(query) = AdjacentQuery::newer(post, self.clock.now(), tag) else {
            return Ok(None);
        };
        Ok(self.posts.find_adjacent(&query).await?)
    }

    /// The previous published post before `post`.
    pub async fn older(&self, post: &Post, tag: Option<&Tag>) -> Result<Option<Post>, DomainError> {
        let Some(query) = AdjacentQuery::older(post, tag) else {
            return Ok(None);
        };
        Ok(self.posts.find_adjacent(&query).await?)
    }

    async fn unique_slug(&self, title: &str) -> Result<String, DomainError> {
        let posts = self.posts.as_ref();
        let slug = generate_slug(title, |candidate| async move {
            posts.slug_exists(&candidate).await
        })
        .await?;
        Ok(slug)
    }

    async fn persist(&self, post: &mut Post, mut staged: Post) -> Result<(), DomainError> {
        let id = staged.id();
        staged.touch(self.clock.now());
        *post = self
            .posts
            .save(staged)
            .await
            .map_err(|e| missing_post(e, id))?;
        Ok(())
    }
}

fn missing_post(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound {
            entity_type: "post",
            id,
        },
        other => other.into(),
    }
}
