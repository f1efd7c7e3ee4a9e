use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored knowledge record being ranked against a query.
///
/// Owned by the external storage layer; this core treats it as immutable
/// input. Equality is identity-based: two items are the same item if their
/// ids match, whatever their content revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Stable identifier assigned by the storage layer.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Full markdown content.
    pub content: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Project the item belongs to.
    pub project: String,
    /// Importance level, 1 (low) to 5 (critical).
    pub importance: u8,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl MemoryItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            project: String::new(),
            importance: 3,
            created_at: Utc::now(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance.clamp(1, 5);
        self
    }
}

impl PartialEq for MemoryItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MemoryItem {}
