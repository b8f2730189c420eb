//! Injectable wall clock.
//!
//! Reminder schedules are expressed in local wall-clock time (daily 20:00,
//! Sunday 09:00), so the trait deals in naive local datetimes. Tests pin
//! "today" with a fixed clock instead of sleeping.

use chrono::{Local, NaiveDate, NaiveDateTime};

pub trait Clock: Send + Sync {
  /// Current local wall-clock time.
  fn now(&self) -> NaiveDateTime;

  /// Current local calendar date.
  fn today(&self) -> NaiveDate {
    self.now().date()
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime {
    Local::now().naive_local()
  }
}
