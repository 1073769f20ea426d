//! Project record.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};

pub type ProjectId = i64;

/// Container for tasks, optionally filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<ProjectId>,
    pub title: String,
    pub description: Option<String>,
    /// Cleared by storage when the referenced category is deleted.
    pub category_id: Option<CategoryId>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            category_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
