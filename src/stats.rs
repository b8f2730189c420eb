//! Windowed consistency statistics.
//!
//! Two denominator policies coexist on purpose: the 30-day overview divides
//! by the number of existing records, while the weekly breakdown divides by
//! the full 7-day window with absent days counted as zero-value entries.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cycle::CYCLE_LENGTH_DAYS;
use crate::error::Result;
use crate::models::DayRecord;
use crate::store::RecordStore;

/// ---------------------------------------------------------------------------
/// Record-window statistics (denominator = record count)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowStats {
  /// Number of records in the window, not calendar days.
  pub total_days: i64,
  pub workout_days: i64,
  pub diet_days: i64,
  pub both_logged_days: i64,
  pub workout_pct: f64,
  pub diet_pct: f64,
  pub completion_pct: f64,
}

impl WindowStats {
  pub fn compute(records: &[DayRecord]) -> Self {
    let total_days = records.len() as i64;
    let workout_days = records.iter().filter(|r| r.workout_logged).count() as i64;
    let diet_days = records.iter().filter(|r| r.diet_logged).count() as i64;
    let both_logged_days = records.iter().filter(|r| r.is_complete()).count() as i64;

    Self {
      total_days,
      workout_days,
      diet_days,
      both_logged_days,
      workout_pct: percentage(workout_days, total_days),
      diet_pct: percentage(diet_days, total_days),
      completion_pct: percentage(both_logged_days, total_days),
    }
  }
}

/// Fetch records in `[start, end]` and compute overview statistics.
pub async fn window_stats(
  store: &dyn RecordStore,
  user_id: i64,
  start: NaiveDate,
  end: NaiveDate,
) -> Result<WindowStats> {
  let records = store.find_range(user_id, start, end).await?;
  Ok(WindowStats::compute(&records))
}

/// ---------------------------------------------------------------------------
/// Weekly breakdown (denominator = 7 calendar days)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
  pub date: NaiveDate,
  /// Full weekday name, e.g. "Monday".
  pub day_name: String,
  pub workout_logged: bool,
  pub diet_logged: bool,
  pub both_complete: bool,
}

/// One entry per calendar day in the 7-day window ending at `end_date`
/// inclusive. Days without a record get all-false flags, so the result
/// always has exactly 7 entries.
pub async fn weekly_breakdown(
  store: &dyn RecordStore,
  user_id: i64,
  end_date: NaiveDate,
) -> Result<Vec<DaySummary>> {
  let start = end_date - Duration::days(6);
  let records = store.find_range(user_id, start, end_date).await?;

  let mut days = Vec::with_capacity(7);
  for offset in 0..7 {
    let date = start + Duration::days(offset);
    let record = records.iter().find(|r| r.date == date);

    days.push(DaySummary {
      date,
      day_name: date.format("%A").to_string(),
      workout_logged: record.map_or(false, |r| r.workout_logged),
      diet_logged: record.map_or(false, |r| r.diet_logged),
      both_complete: record.map_or(false, |r| r.is_complete()),
    });
  }

  Ok(days)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStats {
  pub workout_days: i64,
  pub diet_days: i64,
  pub complete_days: i64,
  pub workout_pct: f64,
  pub diet_pct: f64,
  pub completion_pct: f64,
}

impl WeeklyStats {
  /// Percentages divide by the full 7-day window, never by how many
  /// records happen to exist.
  pub fn compute(days: &[DaySummary]) -> Self {
    let workout_days = days.iter().filter(|d| d.workout_logged).count() as i64;
    let diet_days = days.iter().filter(|d| d.diet_logged).count() as i64;
    let complete_days = days.iter().filter(|d| d.both_complete).count() as i64;

    Self {
      workout_days,
      diet_days,
      complete_days,
      workout_pct: percentage(workout_days, 7),
      diet_pct: percentage(diet_days, 7),
      completion_pct: percentage(complete_days, 7),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Cycle position
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleInfo {
  pub cycle_start: Option<NaiveDate>,
  /// 1-based day within the cycle, capped at 30; 0 when no cycle exists.
  pub cycle_day: i64,
  pub days_remaining: i64,
}

/// Cycle position derived from the most-recent-by-date record's
/// `cycle_start`.
pub async fn cycle_info(
  store: &dyn RecordStore,
  user_id: i64,
  today: NaiveDate,
) -> Result<CycleInfo> {
  let latest = store.find_latest(user_id).await?;

  match latest.and_then(|r| r.cycle_start) {
    Some(start) => {
      let cycle_day = ((today - start).num_days() + 1).min(CYCLE_LENGTH_DAYS);
      Ok(CycleInfo {
        cycle_start: Some(start),
        cycle_day,
        days_remaining: (CYCLE_LENGTH_DAYS - cycle_day).max(0),
      })
    }
    None => Ok(CycleInfo {
      cycle_start: None,
      cycle_day: 0,
      days_remaining: CYCLE_LENGTH_DAYS,
    }),
  }
}

/// count/total as a percentage rounded to 1 decimal; 0 when the window is
/// empty.
fn percentage(count: i64, total: i64) -> f64 {
  if total > 0 {
    (count as f64 / total as f64 * 1000.0).round() / 10.0
  } else {
    0.0
  }
}
