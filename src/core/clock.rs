//! Source of "now" for every scheduling computation.
//!
//! The development time offset (config `time_offset_minutes`) lives in
//! `SystemClock`; tests pin time with `FixedClock`.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

/// Largest development offset accepted, about a thousand years either way.
pub const MAX_OFFSET_MINUTES: i64 = 1000 * 366 * 24 * 60;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Duration,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset_minutes(minutes: i64) -> AppResult<Self> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(AppError::InvalidDate(format!(
                "time offset of {} minute(s) is out of range",
                minutes
            )));
        }
        let offset = Duration::try_minutes(minutes).ok_or_else(|| {
            AppError::InvalidDate(format!("time offset of {} minute(s) is out of range", minutes))
        })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let real = Utc::now();
        real.checked_add_signed(self.offset).unwrap_or(real)
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Offset in whole minutes that makes a clock reading `real_now` show `target`.
pub fn offset_minutes_to(target: DateTime<Utc>, real_now: DateTime<Utc>) -> i64 {
    (target - real_now).num_minutes()
}
