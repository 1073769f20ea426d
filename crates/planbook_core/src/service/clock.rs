//! Time source for audit timestamps.
//!
//! # Invariants
//! - Clocks return UTC wall time as `NaiveDateTime`.
//! - `SystemClock` truncates to milliseconds, the precision `audit_log.ts`
//!   is stored at, so written and read-back values compare equal.

use chrono::{NaiveDateTime, Timelike, Utc};

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        let millis_only = now.nanosecond() / 1_000_000 * 1_000_000;
        now.with_nanosecond(millis_only).unwrap_or(now)
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
