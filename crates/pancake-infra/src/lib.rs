//! # Pancake Infrastructure
//!
//! Concrete implementations of the ports defined in `pancake-core`.
//! This crate contains the storage adapters, the Markdown renderer and the
//! configuration/telemetry glue.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM

pub mod config;
pub mod database;
pub mod memory;
pub mod render;
pub mod state;
pub mod telemetry;

// Re-exports
pub use config::BlogConfig;
pub use database::DatabaseConfig;
pub use memory::InMemoryBlogStore;
pub use render::MarkdownRenderer;
pub use state::BlogState;
pub use telemetry::{TelemetryConfig, init_telemetry};

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresTagRepository};
