//! Services - the operations the surrounding application calls.

mod posts;
mod tags;

pub use posts::{PostService, PostServiceConfig};
pub use tags::TagCatalog;
