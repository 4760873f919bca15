//! Wall-clock access
//!
//! Cooldowns compare raw instants; streaks compare calendar dates in the
//! player's local time zone. Both go through [`Clock`] so tests can pin them.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `at` in the local time zone
    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate;

    /// Offset used to group history by day
    fn utc_offset(&self) -> FixedOffset;
}

/// Host clock and time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }

    fn utc_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// Settable clock with a fixed offset
///
/// Clones share the same instant, so a test can keep a handle and advance
/// time while the game owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            offset,
        }
    }

    /// Manual clock in UTC
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    fn utc_offset(&self) -> FixedOffset {
        self.offset
    }
}
