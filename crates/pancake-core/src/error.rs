//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::RenderError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Slug '{slug}' still collided after {attempts} insert attempts")]
    SlugCollisionRetryExhausted { slug: String, attempts: u32 },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Storage(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A unique constraint rejected the write.
    #[error("Unique constraint conflict: {0}")]
    Conflict(String),
}
