//! High-level consistency operations.
//!
//! `ConsistencyService` is the entry point callers use: it owns the
//! injected collaborators and composes the streak, cycle, stats and
//! motivation pieces into whole operations.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Timelike};
use serde::Serialize;

use crate::clock::Clock;
use crate::cycle;
use crate::error::{CoreError, Result};
use crate::models::{ActivityKind, DayRecord, NewDayRecord};
use crate::motivation::{self, Achievement};
use crate::notify::{NotificationSink, CATEGORY_ACHIEVEMENT};
use crate::scheduler::missed_items;
use crate::stats::{self, CycleInfo, DaySummary, WeeklyStats, WindowStats};
use crate::store::{RecordStore, UserDirectory};
use crate::streak;

/// After this hour, unlogged entries count as missed for the day.
const MISSED_CUTOFF_HOUR: u32 = 20;

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_log_date(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|_| CoreError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct LogOutcome {
  pub record: DayRecord,
  pub both_complete: bool,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodayStatus {
  pub workout_logged: bool,
  pub diet_logged: bool,
  pub both_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyOverview {
  pub stats: WindowStats,
  pub current_streak: i64,
  pub cycle: CycleInfo,
  pub today: TodayStatus,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakSummary {
  pub current_streak: i64,
  pub best_streak: i64,
  pub missed_today: bool,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReset {
  pub cycle_start: NaiveDate,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
  pub days: Vec<DaySummary>,
  pub stats: WeeklyStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissedCheck {
  pub should_notify: bool,
  pub missed: Vec<ActivityKind>,
  pub current_streak: Option<i64>,
  pub message: String,
}

pub struct ConsistencyService {
  store: Arc<dyn RecordStore>,
  users: Arc<dyn UserDirectory>,
  sink: Arc<dyn NotificationSink>,
  clock: Arc<dyn Clock>,
}

impl ConsistencyService {
  pub fn new(
    store: Arc<dyn RecordStore>,
    users: Arc<dyn UserDirectory>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self {
      store,
      users,
      sink,
      clock,
    }
  }

  /// Mark one activity as logged for `date`, recompute the stored streak
  /// snapshot, and announce any milestone reached.
  pub async fn log_activity(
    &self,
    user_id: i64,
    kind: ActivityKind,
    date: NaiveDate,
  ) -> Result<LogOutcome> {
    let record = cycle::get_or_create_record(self.store.as_ref(), user_id, date).await?;

    let mut update = NewDayRecord::from(&record);
    match kind {
      ActivityKind::Workout => update.workout_logged = true,
      ActivityKind::Diet => update.diet_logged = true,
    }

    // Persist the flag before the streak walk so a backfilled day counts
    // its own activity in the recomputed snapshot.
    let stored = self.store.upsert(&update).await?;

    let today = self.clock.today();
    let current = streak::current_streak(self.store.as_ref(), user_id, today).await?;

    let mut snapshot = NewDayRecord::from(&stored);
    snapshot.streak_day = current;
    let stored = self.store.upsert(&snapshot).await?;

    if let Some(achievement) = motivation::streak_milestone(current) {
      // Milestone announcements are best effort; a dead sink must not fail
      // the log itself.
      if let Err(e) = self.announce_achievement(user_id, achievement).await {
        tracing::warn!(user_id, error = %e, "milestone announcement failed");
      }
    }

    let message = {
      let mut rng = rand::thread_rng();
      motivation::select_message(&mut rng, current, 0)
    };

    tracing::info!(user_id, activity = %kind, date = %date, "activity logged");
    Ok(LogOutcome {
      both_complete: stored.is_complete(),
      record: stored,
      message,
    })
  }

  /// 30-day window statistics plus streak, cycle position and today's
  /// flags.
  pub async fn overview(&self, user_id: i64) -> Result<ConsistencyOverview> {
    let today = self.clock.today();
    let start = today - Duration::days(29);

    let window = stats::window_stats(self.store.as_ref(), user_id, start, today).await?;
    let current = streak::current_streak(self.store.as_ref(), user_id, today).await?;
    let cycle = stats::cycle_info(self.store.as_ref(), user_id, today).await?;

    let today_record = self.store.find(user_id, today).await?;
    let today_status = TodayStatus {
      workout_logged: today_record.as_ref().map_or(false, |r| r.workout_logged),
      diet_logged: today_record.as_ref().map_or(false, |r| r.diet_logged),
      both_complete: today_record.as_ref().map_or(false, |r| r.is_complete()),
    };

    let message = {
      let mut rng = rand::thread_rng();
      motivation::select_message(&mut rng, current, 0)
    };

    Ok(ConsistencyOverview {
      stats: window,
      current_streak: current,
      cycle,
      today: today_status,
      message,
    })
  }

  pub async fn streak_summary(&self, user_id: i64) -> Result<StreakSummary> {
    let today = self.clock.today();
    let current = streak::current_streak(self.store.as_ref(), user_id, today).await?;
    let best = streak::best_streak(self.store.as_ref(), user_id).await?;

    let today_record = self.store.find(user_id, today).await?;
    let missed_today = !today_record.as_ref().map_or(false, |r| r.is_active());

    let message = {
      let mut rng = rand::thread_rng();
      motivation::select_message(&mut rng, current, if missed_today { 1 } else { 0 })
    };

    Ok(StreakSummary {
      current_streak: current,
      best_streak: best,
      missed_today,
      message,
    })
  }

  /// Explicitly start a fresh 30-day cycle today.
  pub async fn reset_cycle(&self, user_id: i64) -> Result<CycleReset> {
    let today = self.clock.today();
    let cycle_start = cycle::reset_cycle(self.store.as_ref(), user_id, today).await?;

    tracing::info!(user_id, cycle_start = %cycle_start, "cycle reset");
    Ok(CycleReset {
      cycle_start,
      message: "Fresh start! Let's make these 30 days count! 🚀".to_string(),
    })
  }

  pub async fn weekly_summary(&self, user_id: i64) -> Result<WeeklySummary> {
    let today = self.clock.today();
    let days = stats::weekly_breakdown(self.store.as_ref(), user_id, today).await?;
    let stats = WeeklyStats::compute(&days);

    Ok(WeeklySummary { days, stats })
  }

  /// Evening check: after the cutoff hour, report which entries are still
  /// missing today and a nudge message.
  pub async fn check_missed(&self, user_id: i64) -> Result<MissedCheck> {
    let now = self.clock.now();

    if now.time().hour() < MISSED_CUTOFF_HOUR {
      return Ok(MissedCheck {
        should_notify: false,
        missed: Vec::new(),
        current_streak: None,
        message: "Still time to log your progress today!".to_string(),
      });
    }

    let today = now.date();
    let record = self.store.find(user_id, today).await?;
    let missed = missed_items(record.as_ref());

    if missed.is_empty() {
      return Ok(MissedCheck {
        should_notify: false,
        missed,
        current_streak: None,
        message: "Great job! All entries logged for today! 🎉".to_string(),
      });
    }

    let current = streak::current_streak(self.store.as_ref(), user_id, today).await?;
    let message = {
      let mut rng = rand::thread_rng();
      motivation::missed_entry_message(&mut rng, current, &missed)
    };

    Ok(MissedCheck {
      should_notify: true,
      missed,
      current_streak: Some(current),
      message,
    })
  }

  /// Send an achievement notification to a known user. Unknown users are
  /// ignored.
  pub async fn announce_achievement(
    &self,
    user_id: i64,
    achievement: Achievement,
  ) -> Result<()> {
    let user = match self.users.find(user_id).await? {
      Some(user) => user,
      None => return Ok(()),
    };

    let message = motivation::achievement_message(&user.username, achievement);
    self
      .sink
      .dispatch(user_id, &message, CATEGORY_ACHIEVEMENT)
      .await
  }
}
