//! Time source for tracker operations.
//!
//! Week-window and streak computations take "today" as an argument. A
//! [`Clock`] is sampled once per logical operation and the resulting date is
//! threaded through every computation of that operation.

use chrono::{Local, NaiveDate, Utc};

use crate::Time;

/// Source of the current instant and calendar date.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Time;

    /// Calendar date of [`Clock::now`] in the user's local timezone.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }

    /// One reading of the clock as both an instant and its calendar date.
    fn now_and_today(&self) -> (Time, NaiveDate) {
        let now = self.now();
        (now, now.with_timezone(&Local).date_naive())
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: Time,
    today: NaiveDate,
}

impl FixedClock {
    /// Freeze at `now`, deriving the date from the local timezone.
    pub fn new(now: Time) -> Self {
        Self {
            now,
            today: now.with_timezone(&Local).date_naive(),
        }
    }

    /// Freeze at noon UTC of `date`, reporting `date` as today regardless of
    /// the host timezone.
    pub fn on(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { now, today: date }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Time {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_and_today(&self) -> (Time, NaiveDate) {
        (self.now, self.today)
    }
}
