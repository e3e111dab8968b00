//! Domain entities - the core business objects.

mod post;
mod sequence;
mod slugs;
mod tag;

pub use post::{DEFAULT_LAYOUT, NewPost, Post, PostDetails, PostRecord};
pub use sequence::{AdjacentQuery, Direction};
pub use slugs::{FALLBACK_SLUG, generate_slug, slugify};
pub use tag::Tag;
