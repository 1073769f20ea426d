//! Task record and its status enumeration.
//!
//! # Responsibility
//! - Define the task shape with its storage defaults.
//! - Map `TaskStatus` to and from its persisted snake_case form.
//!
//! # Invariants
//! - `status` defaults to `TaskStatus::Pending`, `priority` to `0`.
//! - Any status may be replaced by any other; no transition policy exists.
//! - `due_date`, when set, has a four-digit year.

use crate::model::category::CategoryId;
use crate::model::project::ProjectId;
use crate::model::{validate_storable_date, DomainError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type TaskId = i64;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Pending,
    /// Work is in progress.
    InProgress,
    /// Finished.
    Completed,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Persisted/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::UnknownTaskStatus(other.to_string())),
        }
    }
}

/// Actionable item, optionally scheduled and filed under a category/project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<TaskId>,
    pub title: String,
    /// Indexed for range queries.
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub status: TaskStatus,
    /// Free-form recurrence expression (for example an RRULE). Not interpreted.
    pub recurrence: Option<String>,
    pub priority: i64,
    pub project_id: Option<ProjectId>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            due_date: None,
            category_id: None,
            status: TaskStatus::default(),
            recurrence: None,
            priority: 0,
            project_id: None,
        }
    }

    pub fn due_on(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Parses `status` from its string form.
    ///
    /// # Errors
    /// - `DomainError::UnknownTaskStatus` for anything outside the four states.
    pub fn with_status_str(self, status: &str) -> Result<Self, DomainError> {
        Ok(self.with_status(status.parse()?))
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_recurrence(mut self, recurrence: impl Into<String>) -> Self {
        self.recurrence = Some(recurrence.into());
        self
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Validates fields that may have been assigned directly.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.due_date {
            Some(due_date) => validate_storable_date(due_date),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskStatus};
    use crate::model::DomainError;

    #[test]
    fn status_strings_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_parse_is_case_sensitive() {
        let err = "Completed".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err, DomainError::UnknownTaskStatus("Completed".to_string()));
    }

    #[test]
    fn new_task_uses_storage_defaults() {
        let task = Task::new("water plants");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, 0);
        assert!(task.id.is_none());
    }

    #[test]
    fn five_digit_due_year_is_rejected() {
        let due = chrono::NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        let err = Task::new("far future").due_on(due).validate().unwrap_err();
        assert_eq!(err, DomainError::DateOutOfRange { date: due });

        let due = chrono::NaiveDate::from_ymd_opt(9_999, 12, 31).unwrap();
        assert!(Task::new("edge").due_on(due).validate().is_ok());
    }
}
