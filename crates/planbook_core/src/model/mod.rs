//! Domain model for the planner schema.
//!
//! # Responsibility
//! - Define the six persisted record shapes and their field defaults.
//! - Own domain validation that must hold before any row reaches storage.
//!
//! # Invariants
//! - Every record carries `id: Option<i64>`; `None` until the store assigns it.
//! - `Goal.progress` stays within `0..=100`.
//! - `TaskStatus` is a closed set; unknown strings never become a status.
//! - Stored dates have four-digit years (`0..=9999`) so their text form
//!   sorts chronologically.
//! - Audit timestamps carry at most millisecond precision.
//!
//! # See also
//! - crates/planbook_core/src/db/migrations/0001_init.sql

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod audit_log;
pub mod category;
pub mod goal;
pub mod project;
pub mod task;
pub mod user;

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// Domain/range violation raised before (or while) a value reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// `Goal.progress` outside `0..=100`.
    ProgressOutOfRange { value: i64 },
    /// String that does not name one of the four task states.
    UnknownTaskStatus(String),
    /// Date whose year falls outside `0..=9999`.
    DateOutOfRange { date: NaiveDate },
    /// Audit timestamp finer than the stored millisecond precision.
    SubMillisecondTimestamp { ts: NaiveDateTime },
    /// Storage-level `CHECK` constraint rejected a write.
    CheckConstraint {
        table: &'static str,
        message: String,
    },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProgressOutOfRange { value } => {
                write!(f, "goal progress {value} is outside 0..=100")
            }
            Self::UnknownTaskStatus(value) => write!(
                f,
                "unknown task status `{value}`; expected pending|in_progress|completed|cancelled"
            ),
            Self::DateOutOfRange { date } => write!(
                f,
                "date {date} is outside the storable years {MIN_YEAR}..={MAX_YEAR}"
            ),
            Self::SubMillisecondTimestamp { ts } => {
                write!(f, "timestamp {ts} is finer than millisecond precision")
            }
            Self::CheckConstraint { table, message } => {
                write!(f, "check constraint failed on `{table}`: {message}")
            }
        }
    }
}

impl Error for DomainError {}

/// Rejects dates whose `YYYY-MM-DD` text would not sort chronologically.
pub(crate) fn validate_storable_date(date: NaiveDate) -> Result<(), DomainError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(())
    } else {
        Err(DomainError::DateOutOfRange { date })
    }
}
