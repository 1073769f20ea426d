//! Category record.
//!
//! # Invariants
//! - `name` is unique across all categories (enforced by storage).
//! - Owned projects/tasks/goals are reached through repository queries,
//!   never stored on the record itself.

use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// Label grouping projects, tasks and goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Assigned by the store on first insert.
    pub id: Option<CategoryId>,
    pub name: String,
    /// Free-form display color, e.g. `#ff8800`.
    pub color: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
