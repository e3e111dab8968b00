//! In-memory storage - used when no database is configured.

mod store;

pub use store::InMemoryBlogStore;
