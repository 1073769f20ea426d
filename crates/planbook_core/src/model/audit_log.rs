//! Audit log record.
//!
//! # Invariants
//! - Entries are append-only; `ts` never changes after insert.
//! - `ts` is supplied by the caller (see `service::clock`), always UTC, and
//!   carries at most millisecond precision.

use crate::model::{validate_storable_date, DomainError};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub type AuditLogId = i64;

/// One recorded action against an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Option<AuditLogId>,
    /// UTC creation time.
    pub ts: NaiveDateTime,
    /// Table name of the affected entity, e.g. `task`.
    pub entity: String,
    /// Human-readable action, e.g. `update id=7`.
    pub action: String,
}

impl AuditLog {
    pub fn new(entity: impl Into<String>, action: impl Into<String>, ts: NaiveDateTime) -> Self {
        Self {
            id: None,
            ts,
            entity: entity.into(),
            action: action.into(),
        }
    }

    /// Checks that `ts` survives storage unchanged.
    ///
    /// # Errors
    /// - `DomainError::SubMillisecondTimestamp` when `ts` has sub-millisecond
    ///   digits.
    /// - `DomainError::DateOutOfRange` when the year is outside `0..=9999`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ts.nanosecond() % 1_000_000 != 0 {
            return Err(DomainError::SubMillisecondTimestamp { ts: self.ts });
        }
        validate_storable_date(self.ts.date())
    }
}
