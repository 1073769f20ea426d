//! Goal record.
//!
//! # Invariants
//! - `progress` is within `0..=100`; constructors and setters reject
//!   anything else, and repositories re-run `validate()` on write and read.
//! - Both dates have four-digit years.
//! - `end_date` is not required to follow `start_date`.

use crate::model::category::CategoryId;
use crate::model::{validate_storable_date, DomainError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub type GoalId = i64;

pub const PROGRESS_MIN: i64 = 0;
pub const PROGRESS_MAX: i64 = 100;

/// Time-boxed objective with a percentage progress marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Option<GoalId>,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Percentage, `0..=100`.
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: i64,
    pub category_id: Option<CategoryId>,
}

impl Goal {
    /// Creates a goal with `progress = 0`.
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: None,
            title: title.into(),
            start_date,
            end_date,
            progress: PROGRESS_MIN,
            category_id: None,
        }
    }

    /// Builder form of [`Goal::set_progress`].
    pub fn with_progress(mut self, progress: i64) -> Result<Self, DomainError> {
        self.set_progress(progress)?;
        Ok(self)
    }

    /// Replaces progress, leaving the goal untouched on rejection.
    ///
    /// # Errors
    /// - `DomainError::ProgressOutOfRange` when `progress` is outside `0..=100`.
    pub fn set_progress(&mut self, progress: i64) -> Result<(), DomainError> {
        validate_progress(progress)?;
        self.progress = progress;
        Ok(())
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Validates fields that may have been assigned directly.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_progress(self.progress)?;
        validate_storable_date(self.start_date)?;
        validate_storable_date(self.end_date)
    }

    /// Whether `date` falls inside `start_date..=end_date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    validate_progress(value).map_err(serde::de::Error::custom)?;
    Ok(value)
}

fn validate_progress(progress: i64) -> Result<(), DomainError> {
    if (PROGRESS_MIN..=PROGRESS_MAX).contains(&progress) {
        Ok(())
    } else {
        Err(DomainError::ProgressOutOfRange { value: progress })
    }
}
