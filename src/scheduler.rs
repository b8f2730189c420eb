//! Reminder scheduling.
//!
//! A single background task sleeps until the earlier of the next daily
//! reminder (20:00 every day) or the next weekly motivation (Sunday 09:00),
//! runs that sweep, and recomputes. Shutdown is cooperative: a sweep in
//! progress finishes the user it is on, then the loop exits.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::error::Result;
use crate::models::{ActiveUser, ActivityKind, DayRecord};
use crate::motivation;
use crate::notify::{NotificationSink, CATEGORY_DAILY_REMINDER, CATEGORY_WEEKLY_MOTIVATION};
use crate::stats::{weekly_breakdown, WeeklyStats};
use crate::store::{RecordStore, UserDirectory};
use crate::streak::current_streak;

pub const DAILY_REMINDER_HOUR: u32 = 20;
pub const WEEKLY_MOTIVATION_HOUR: u32 = 9;
pub const WEEKLY_MOTIVATION_DAY: Weekday = Weekday::Sun;

/// ---------------------------------------------------------------------------
/// Fire-time computation
/// ---------------------------------------------------------------------------

fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Next daily reminder instant strictly after `after`.
pub fn next_daily_fire(after: NaiveDateTime) -> NaiveDateTime {
    let today = at_hour(after.date(), DAILY_REMINDER_HOUR);
    if today > after {
        today
    } else {
        at_hour(after.date() + Duration::days(1), DAILY_REMINDER_HOUR)
    }
}

/// Next weekly motivation instant strictly after `after`.
pub fn next_weekly_fire(after: NaiveDateTime) -> NaiveDateTime {
    for offset in 0..=7 {
        let date = after.date() + Duration::days(offset);
        if date.weekday() != WEEKLY_MOTIVATION_DAY {
            continue;
        }
        let candidate = at_hour(date, WEEKLY_MOTIVATION_HOUR);
        if candidate > after {
            return candidate;
        }
    }
    // A Sunday always falls within the 0..=7 window above.
    at_hour(after.date() + Duration::days(7), WEEKLY_MOTIVATION_HOUR)
}

/// ---------------------------------------------------------------------------
/// Sweeps
/// ---------------------------------------------------------------------------

/// Shared collaborators handed to every sweep.
#[derive(Clone)]
pub struct SweepContext {
    pub store: Arc<dyn RecordStore>,
    pub users: Arc<dyn UserDirectory>,
    pub sink: Arc<dyn NotificationSink>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub notified: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Activities the user has not logged on the record's day. No record at all
/// means both are outstanding.
pub(crate) fn missed_items(record: Option<&DayRecord>) -> Vec<ActivityKind> {
    match record {
        Some(r) => {
            let mut missed = Vec::new();
            if !r.workout_logged {
                missed.push(ActivityKind::Workout);
            }
            if !r.diet_logged {
                missed.push(ActivityKind::Diet);
            }
            missed
        }
        None => vec![ActivityKind::Workout, ActivityKind::Diet],
    }
}

async fn remind_user(ctx: &SweepContext, user: &ActiveUser) -> Result<bool> {
    let today = ctx.clock.today();
    let record = ctx.store.find(user.id, today).await?;
    let missed = missed_items(record.as_ref());

    if missed.is_empty() {
        return Ok(false);
    }

    let streak = current_streak(ctx.store.as_ref(), user.id, today).await?;
    let message = {
        let mut rng = rand::thread_rng();
        motivation::daily_reminder_message(&mut rng, &user.username, streak, &missed)
    };

    ctx.sink
        .dispatch(user.id, &message, CATEGORY_DAILY_REMINDER)
        .await?;
    Ok(true)
}

/// Remind every active user who still has something to log today. Failures
/// are isolated per user; a shutdown signal stops between users.
async fn daily_sweep(ctx: &SweepContext, shutdown: &watch::Receiver<bool>) -> Result<SweepReport> {
    let users = ctx.users.list_active().await?;
    let mut report = SweepReport::default();

    for user in &users {
        if *shutdown.borrow() {
            tracing::info!(remaining = users.len() - report.notified - report.skipped - report.failed,
                "daily sweep interrupted by shutdown");
            break;
        }

        match remind_user(ctx, user).await {
            Ok(true) => report.notified += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                report.failed += 1;
                tracing::error!(user_id = user.id, error = %e, "daily reminder failed");
            }
        }
    }

    tracing::info!(
        notified = report.notified,
        skipped = report.skipped,
        failed = report.failed,
        "daily sweep finished"
    );
    Ok(report)
}

async fn motivate_user(ctx: &SweepContext, user: &ActiveUser) -> Result<()> {
    let today = ctx.clock.today();
    let days = weekly_breakdown(ctx.store.as_ref(), user.id, today).await?;
    let stats = WeeklyStats::compute(&days);

    let message = {
        let mut rng = rand::thread_rng();
        motivation::weekly_tier_message(
            &mut rng,
            &user.username,
            stats.completion_pct,
            stats.complete_days,
        )
    };

    ctx.sink
        .dispatch(user.id, &message, CATEGORY_WEEKLY_MOTIVATION)
        .await
}

/// Send every active user a weekly recap message tiered by completion rate.
async fn weekly_sweep(ctx: &SweepContext, shutdown: &watch::Receiver<bool>) -> Result<SweepReport> {
    let users = ctx.users.list_active().await?;
    let mut report = SweepReport::default();

    for user in &users {
        if *shutdown.borrow() {
            tracing::info!("weekly sweep interrupted by shutdown");
            break;
        }

        match motivate_user(ctx, user).await {
            Ok(()) => report.notified += 1,
            Err(e) => {
                report.failed += 1;
                tracing::error!(user_id = user.id, error = %e, "weekly motivation failed");
            }
        }
    }

    tracing::info!(
        notified = report.notified,
        failed = report.failed,
        "weekly sweep finished"
    );
    Ok(report)
}

/// One-shot daily sweep, outside the scheduler loop.
pub async fn run_daily_sweep(ctx: &SweepContext) -> Result<SweepReport> {
    let (_tx, rx) = watch::channel(false);
    daily_sweep(ctx, &rx).await
}

/// One-shot weekly sweep, outside the scheduler loop.
pub async fn run_weekly_sweep(ctx: &SweepContext) -> Result<SweepReport> {
    let (_tx, rx) = watch::channel(false);
    weekly_sweep(ctx, &rx).await
}

/// ---------------------------------------------------------------------------
/// Scheduler loop
/// ---------------------------------------------------------------------------

struct RunningLoop {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct ReminderScheduler {
    ctx: SweepContext,
    running: Mutex<Option<RunningLoop>>,
}

impl ReminderScheduler {
    pub fn new(ctx: SweepContext) -> Self {
        Self {
            ctx,
            running: Mutex::new(None),
        }
    }

    /// Spawn the background loop. Calling `start` while already running is
    /// a no-op.
    pub async fn start(&self) {
        let mut running = self.running.lock().await;
        if running.is_some() {
            tracing::warn!("scheduler already running, start ignored");
            return;
        }

        let (tx, rx) = watch::channel(false);
        let ctx = self.ctx.clone();
        let task = tokio::spawn(run_loop(ctx, rx));

        *running = Some(RunningLoop { shutdown: tx, task });
        tracing::info!("reminder scheduler started");
    }

    /// Signal shutdown and wait for the loop to finish its current user.
    pub async fn stop(&self) {
        let handle = self.running.lock().await.take();
        if let Some(RunningLoop { shutdown, task }) = handle {
            let _ = shutdown.send(true);
            if let Err(e) = task.await {
                tracing::error!(error = %e, "scheduler task ended abnormally");
            }
            tracing::info!("reminder scheduler stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }
}

enum Job {
    Daily,
    Weekly,
}

async fn run_loop(ctx: SweepContext, mut shutdown: watch::Receiver<bool>) {
    loop {
        let now = ctx.clock.now();
        let daily = next_daily_fire(now);
        let weekly = next_weekly_fire(now);
        let (fire_at, job) = if daily <= weekly {
            (daily, Job::Daily)
        } else {
            (weekly, Job::Weekly)
        };

        let wait = (fire_at - now).to_std().unwrap_or(std::time::Duration::ZERO);
        tracing::debug!(fire_at = %fire_at, "scheduler sleeping until next job");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                let result = match job {
                    Job::Daily => daily_sweep(&ctx, &shutdown).await,
                    Job::Weekly => weekly_sweep(&ctx, &shutdown).await,
                };
                if let Err(e) = result {
                    tracing::error!(error = %e, "sweep failed");
                }
            }
            _ = shutdown.changed() => {}
        }

        if *shutdown.borrow() {
            break;
        }
    }
}
