use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One row per (user, calendar date). The store enforces uniqueness on that
/// pair; flags are mutated in place by later log events, never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DayRecord {
  pub id: i64,
  pub user_id: i64,
  pub date: NaiveDate,
  pub workout_logged: bool,
  pub diet_logged: bool,
  /// Snapshot of the streak length as of the last update to this record.
  pub streak_day: i64,
  /// Date the active 30-day cycle containing this record began.
  pub cycle_start: Option<NaiveDate>,
}

impl DayRecord {
  /// A day counts toward the streak when either activity was logged.
  pub fn is_active(&self) -> bool {
    self.workout_logged || self.diet_logged
  }

  /// A day is complete only when both activities were logged.
  pub fn is_complete(&self) -> bool {
    self.workout_logged && self.diet_logged
  }
}

/// For inserting or upserting records (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDayRecord {
  pub user_id: i64,
  pub date: NaiveDate,
  pub workout_logged: bool,
  pub diet_logged: bool,
  pub streak_day: i64,
  pub cycle_start: Option<NaiveDate>,
}

impl NewDayRecord {
  /// A freshly created record: nothing logged yet, cycle boundary decided
  /// by the cycle manager.
  pub fn blank(user_id: i64, date: NaiveDate, cycle_start: NaiveDate) -> Self {
    Self {
      user_id,
      date,
      workout_logged: false,
      diet_logged: false,
      streak_day: 0,
      cycle_start: Some(cycle_start),
    }
  }
}

impl From<&DayRecord> for NewDayRecord {
  fn from(record: &DayRecord) -> Self {
    Self {
      user_id: record.user_id,
      date: record.date,
      workout_logged: record.workout_logged,
      diet_logged: record.diet_logged,
      streak_day: record.streak_day,
      cycle_start: record.cycle_start,
    }
  }
}

/// The two activities a user can log for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
  Workout,
  Diet,
}

impl ActivityKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ActivityKind::Workout => "workout",
      ActivityKind::Diet => "diet",
    }
  }
}

impl std::fmt::Display for ActivityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for ActivityKind {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "workout" => Ok(ActivityKind::Workout),
      "diet" => Ok(ActivityKind::Diet),
      other => Err(CoreError::InvalidActivity(other.to_string())),
    }
  }
}
