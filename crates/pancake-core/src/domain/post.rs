use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::{ContentRenderer, RenderError};

/// Layout assigned to posts that do not pick one.
pub const DEFAULT_LAYOUT: &str = "blog.layouts.post";

/// Free-form presentation attributes of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetails {
    pub subtitle: String,
    pub page_image: String,
    pub meta_description: String,
    pub layout: String,
}

impl Default for PostDetails {
    fn default() -> Self {
        Self {
            subtitle: String::new(),
            page_image: String::new(),
            meta_description: String::new(),
            layout: DEFAULT_LAYOUT.to_string(),
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content_raw: String,
    pub details: PostDetails,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content_raw: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_raw: content_raw.into(),
            ..Self::default()
        }
    }

    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn draft(mut self) -> Self {
        self.is_draft = true;
        self
    }

    pub fn with_details(mut self, details: PostDetails) -> Self {
        self.details = details;
        self
    }

    /// Reject titles that would only produce a fallback slug.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title(&self.title)
    }
}

/// Storage shape of a post, one field per column.
///
/// Adapters load rows into a record and hand it to [`Post::from_record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub slug: String,
    pub content_raw: String,
    pub content_html: String,
    pub page_image: String,
    pub meta_description: String,
    pub layout: String,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post entity - a blog post with its slug, raw markup and rendered HTML.
///
/// The slug is fixed at creation and the HTML can only change together with
/// the raw content, so both are reachable through getters only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    id: Uuid,
    title: String,
    slug: String,
    content_raw: String,
    content_html: String,
    #[serde(flatten)]
    details: PostDetails,
    is_draft: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post, rendering its content once.
    ///
    /// `slug` must already be resolved against storage, see
    /// [`generate_slug`](crate::domain::generate_slug). Both timestamps are
    /// set to `now`.
    pub fn new(
        new_post: NewPost,
        slug: String,
        renderer: &dyn ContentRenderer,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        new_post.validate()?;
        let content_html = renderer.render(&new_post.content_raw)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title: new_post.title,
            slug,
            content_raw: new_post.content_raw,
            content_html,
            details: new_post.details,
            is_draft: new_post.is_draft,
            published_at: new_post.published_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a post from a stored record.
    pub fn from_record(record: PostRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            slug: record.slug,
            content_raw: record.content_raw,
            content_html: record.content_html,
            details: PostDetails {
                subtitle: record.subtitle,
                page_image: record.page_image,
                meta_description: record.meta_description,
                layout: record.layout,
            },
            is_draft: record.is_draft,
            published_at: record.published_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn into_record(self) -> PostRecord {
        PostRecord {
            id: self.id,
            title: self.title,
            subtitle: self.details.subtitle,
            slug: self.slug,
            content_raw: self.content_raw,
            content_html: self.content_html,
            page_image: self.details.page_image,
            meta_description: self.details.meta_description,
            layout: self.details.layout,
            is_draft: self.is_draft,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn content_raw(&self) -> &str {
        &self.content_raw
    }

    /// Alias for [`Post::content_raw`].
    pub fn content(&self) -> &str {
        &self.content_raw
    }

    pub fn content_html(&self) -> &str {
        &self.content_html
    }

    pub fn details(&self) -> &PostDetails {
        &self.details
    }

    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the post takes part in navigation at all.
    pub fn is_eligible(&self) -> bool {
        !self.is_draft && self.published_at.is_some()
    }

    /// Date portion of the publish time, e.g. `Oct-5-2026`.
    pub fn publish_date(&self) -> Option<String> {
        self.published_at.map(|at| at.format("%b-%-d-%Y").to_string())
    }

    /// Time portion of the publish time, e.g. `3:07 PM`.
    pub fn publish_time(&self) -> Option<String> {
        self.published_at.map(|at| at.format("%-I:%M %p").to_string())
    }

    /// Change the title. The slug keeps its creation-time value.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        Ok(())
    }

    /// Replace the raw content and its rendering.
    ///
    /// The HTML is produced before anything is assigned, so a renderer
    /// failure leaves the post untouched.
    pub fn set_content(
        &mut self,
        content_raw: impl Into<String>,
        renderer: &dyn ContentRenderer,
    ) -> Result<(), RenderError> {
        let content_raw = content_raw.into();
        let content_html = renderer.render(&content_raw)?;
        self.content_raw = content_raw;
        self.content_html = content_html;
        Ok(())
    }

    pub fn set_details(&mut self, details: PostDetails) {
        self.details = details;
    }

    pub fn set_publication(&mut self, is_draft: bool, published_at: Option<DateTime<Utc>>) {
        self.is_draft = is_draft;
        self.published_at = published_at;
    }

    /// Swap the slug of a post that has not been stored yet.
    pub(crate) fn with_slug(mut self, slug: String) -> Self {
        self.slug = slug;
        self
    }

    /// Record a modification at `at`. Mutators leave `updated_at` alone.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation(
            "Post title must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct UpperRenderer;

    impl ContentRenderer for UpperRenderer {
        fn render(&self, raw: &str) -> Result<String, RenderError> {
            Ok(format!("<p>{}</p>", raw.to_uppercase()))
        }
    }

    struct BrokenRenderer;

    impl ContentRenderer for BrokenRenderer {
        fn render(&self, _raw: &str) -> Result<String, RenderError> {
            Err(RenderError::Failed("boom".to_string()))
        }
    }

    fn sample() -> Post {
        Post::new(
            NewPost::new("Hello World", "first"),
            "hello-world".to_string(),
            &UpperRenderer,
            created(),
        )
        .unwrap()
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_new_post_renders_content() {
        let post = sample();
        assert_eq!(post.slug(), "hello-world");
        assert_eq!(post.content_raw(), "first");
        assert_eq!(post.content_html(), "<p>FIRST</p>");
        assert_eq!(post.details().layout, DEFAULT_LAYOUT);
        assert!(!post.is_eligible());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let result = Post::new(
            NewPost::new("  ", "body"),
            "post".to_string(),
            &UpperRenderer,
            created(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_timestamps_come_from_the_caller() {
        let mut post = sample();
        assert_eq!(post.created_at(), created());
        assert_eq!(post.updated_at(), created());

        post.set_title("Edited").unwrap();
        assert_eq!(post.updated_at(), created());

        let later = created() + chrono::Duration::days(2);
        post.touch(later);
        assert_eq!(post.created_at(), created());
        assert_eq!(post.updated_at(), later);
    }

    #[test]
    fn test_retitle_keeps_slug() {
        let mut post = sample();
        post.set_title("A Different Title").unwrap();
        assert_eq!(post.title(), "A Different Title");
        assert_eq!(post.slug(), "hello-world");
        assert!(post.set_title("").is_err());
        assert_eq!(post.title(), "A Different Title");
    }

    #[test]
    fn test_set_content_rerenders() {
        let mut post = sample();
        post.set_content("second", &UpperRenderer).unwrap();
        assert_eq!(post.content(), "second");
        assert_eq!(post.content_html(), "<p>SECOND</p>");
    }

    #[test]
    fn test_failed_render_leaves_content_untouched() {
        let mut post = sample();
        let before = post.clone();

        assert!(post.set_content("second", &BrokenRenderer).is_err());
        assert_eq!(post, before);
    }

    #[test]
    fn test_publish_date_and_time_format() {
        let mut post = sample();
        assert_eq!(post.publish_date(), None);

        let at = Utc.with_ymd_and_hms(2026, 10, 5, 15, 7, 0).unwrap();
        post.set_publication(false, Some(at));
        assert_eq!(post.publish_date().as_deref(), Some("Oct-5-2026"));
        assert_eq!(post.publish_time().as_deref(), Some("3:07 PM"));
        assert!(post.is_eligible());
    }

    #[test]
    fn test_record_round_trip_preserves_post() {
        let post = sample();
        let restored = Post::from_record(post.clone().into_record());
        assert_eq!(restored, post);
    }

    #[test]
    fn test_serialized_post_flattens_details() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["slug"], "hello-world");
        assert_eq!(json["layout"], DEFAULT_LAYOUT);
        assert_eq!(json["content_html"], "<p>FIRST</p>");
    }
}
