//! Chronological navigation over published posts.
//!
//! Posts that are not drafts and carry a publish time form a sequence ordered
//! by `published_at`. When several candidates share the winning timestamp the
//! post id decides: the smallest id going forward, the largest going back.

use chrono::{DateTime, Utc};

use super::{Post, Tag};

/// Which neighbour of the reference post to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Immediate successor, never later than `not_after`.
    Newer,
    /// Immediate predecessor, no upper bound.
    Older,
}

/// A neighbour lookup relative to a reference post.
///
/// Storage adapters translate this into their own query language; the
/// in-memory store uses [`AdjacentQuery::closest`] directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentQuery {
    pub direction: Direction,
    /// Publish time of the reference post.
    pub pivot: DateTime<Utc>,
    /// Upper bound for newer posts, usually "now".
    pub not_after: Option<DateTime<Utc>>,
    /// Only consider posts carrying a tag with this exact name.
    pub tag: Option<String>,
}

impl AdjacentQuery {
    /// Successor lookup. `None` when the reference has never been published.
    pub fn newer(reference: &Post, now: DateTime<Utc>, tag: Option<&Tag>) -> Option<Self> {
        Some(Self {
            direction: Direction::Newer,
            pivot: reference.published_at()?,
            not_after: Some(now),
            tag: tag.map(|t| t.name.clone()),
        })
    }

    /// Predecessor lookup. `None` when the reference has never been published.
    pub fn older(reference: &Post, tag: Option<&Tag>) -> Option<Self> {
        Some(Self {
            direction: Direction::Older,
            pivot: reference.published_at()?,
            not_after: None,
            tag: tag.map(|t| t.name.clone()),
        })
    }

    /// Whether `post` is eligible and lies on the searched side of the pivot.
    pub fn admits(&self, post: &Post) -> bool {
        if post.is_draft() {
            return false;
        }
        let Some(at) = post.published_at() else {
            return false;
        };

        match self.direction {
            Direction::Newer => {
                at > self.pivot && self.not_after.is_none_or(|limit| at <= limit)
            }
            Direction::Older => at < self.pivot,
        }
    }

    /// Pick the immediate neighbour among `candidates`.
    ///
    /// Tag membership is not checked here; callers pass only posts that
    /// carry [`AdjacentQuery::tag`].
    pub fn closest<'a, I>(&self, candidates: I) -> Option<&'a Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let admitted = candidates.into_iter().filter(|post| self.admits(post));
        match self.direction {
            Direction::Newer => admitted.min_by_key(|post| (post.published_at(), post.id())),
            Direction::Older => admitted.max_by_key(|post| (post.published_at(), post.id())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostRecord;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, n, 12, 0, 0).unwrap()
    }

    fn post(id: u128, published_at: Option<DateTime<Utc>>, is_draft: bool) -> Post {
        Post::from_record(PostRecord {
            id: Uuid::from_u128(id),
            title: format!("Post {id}"),
            subtitle: String::new(),
            slug: format!("post-{id}"),
            content_raw: String::new(),
            content_html: String::new(),
            page_image: String::new(),
            meta_description: String::new(),
            layout: String::new(),
            is_draft,
            published_at,
            created_at: day(1),
            updated_at: day(1),
        })
    }

    #[test]
    fn test_newer_skips_drafts_and_future_posts() {
        let p1 = post(1, Some(day(1)), false);
        let p2 = post(2, Some(day(2)), false);
        let p3 = post(3, Some(day(3)), true);
        let p4 = post(4, Some(day(4)), false);
        let all = [p1.clone(), p2.clone(), p3, p4];
        let now = day(3) + Duration::hours(1);

        let query = AdjacentQuery::newer(&p1, now, None).unwrap();
        assert_eq!(query.closest(&all), Some(&p2));

        let query = AdjacentQuery::newer(&p2, now, None).unwrap();
        assert_eq!(query.closest(&all), None);
    }

    #[test]
    fn test_older_has_no_upper_bound() {
        let p1 = post(1, Some(day(1)), false);
        let p2 = post(2, Some(day(2)), false);
        let unpublished = post(5, None, false);
        let all = [p1.clone(), p2.clone(), unpublished];

        assert_eq!(AdjacentQuery::older(&p2, None).unwrap().closest(&all), Some(&p1));
        assert_eq!(AdjacentQuery::older(&p1, None).unwrap().closest(&all), None);
    }

    #[test]
    fn test_unpublished_reference_has_no_neighbours() {
        let draft = post(9, None, true);
        assert!(AdjacentQuery::newer(&draft, day(5), None).is_none());
        assert!(AdjacentQuery::older(&draft, None).is_none());
    }

    #[test]
    fn test_ties_break_on_id() {
        let reference = post(1, Some(day(1)), false);
        let low = post(10, Some(day(2)), false);
        let high = post(20, Some(day(2)), false);
        let all = [high.clone(), reference.clone(), low.clone()];

        let newer = AdjacentQuery::newer(&reference, day(9), None).unwrap();
        assert_eq!(newer.closest(&all), Some(&low));

        let later = post(30, Some(day(3)), false);
        let all = [high.clone(), low, later.clone()];
        let older = AdjacentQuery::older(&later, None).unwrap();
        assert_eq!(older.closest(&all), Some(&high));
    }

    #[test]
    fn test_posts_sharing_the_pivot_are_not_neighbours() {
        let reference = post(1, Some(day(2)), false);
        let twin = post(2, Some(day(2)), false);
        let all = [reference.clone(), twin];

        assert_eq!(AdjacentQuery::newer(&reference, day(9), None).unwrap().closest(&all), None);
        assert_eq!(AdjacentQuery::older(&reference, None).unwrap().closest(&all), None);
    }

    #[test]
    fn test_tag_filter_is_carried_by_name() {
        let reference = post(1, Some(day(1)), false);
        let tag = Tag::new("beta");
        let query = AdjacentQuery::newer(&reference, day(2), Some(&tag)).unwrap();
        assert_eq!(query.tag.as_deref(), Some("beta"));
    }
}
