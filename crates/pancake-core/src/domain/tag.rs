use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a named label attached to posts.
///
/// Names are matched exactly and case-sensitively; storage keeps them unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    /// Create a new tag with a generated ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
