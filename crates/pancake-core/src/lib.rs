//! # Pancake Core
//!
//! The domain layer of the Pancake blog.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! post entities, slug derivation, tag synchronization and chronological navigation.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{PostService, PostServiceConfig, TagCatalog};
