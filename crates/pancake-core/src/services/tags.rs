use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::domain::Tag;
use crate::error::{DomainError, RepoError};
use crate::ports::TagRepository;

/// Tag catalog - makes sure every referenced tag name has a row.
#[derive(Clone)]
pub struct TagCatalog {
    tags: Arc<dyn TagRepository>,
}

impl TagCatalog {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    /// Create a tag for every name in `names` that is not stored yet.
    ///
    /// Losing a creation race to another writer counts as success.
    pub async fn ensure_exist(&self, names: &BTreeSet<String>) -> Result<(), DomainError> {
        if names.is_empty() {
            return Ok(());
        }
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(DomainError::Validation(
                "Tag names must not be blank".to_string(),
            ));
        }

        let existing: HashSet<String> = self
            .tags
            .find_by_names(names)
            .await?
            .into_iter()
            .map(|tag| tag.name)
            .collect();

        for name in names.iter().filter(|name| !existing.contains(*name)) {
            match self.tags.create(Tag::new(name.clone())).await {
                Ok(_) | Err(RepoError::Conflict(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Look up every name in `names`; all of them must exist.
    pub async fn resolve(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, DomainError> {
        let found = self.tags.find_by_names(names).await?;
        if found.len() != names.len() {
            return Err(RepoError::NotFound.into());
        }
        Ok(found)
    }

    pub async fn find(&self, name: &str) -> Result<Option<Tag>, DomainError> {
        Ok(self.tags.find_by_name(name).await?)
    }
}
