//! Shared helpers for the test suites: in-memory databases, seed data, and
//! fake collaborators.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::notify::NotificationSink;

/// ---------------------------------------------------------------------------
/// Database helpers
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database with migrations applied.
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures.
pub async fn setup_test_db() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool.
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert a user row and return its id.
pub async fn seed_test_user(
  pool: &SqlitePool,
  username: &str,
  email: &str,
  is_active: bool,
) -> i64 {
  let result =
    sqlx::query("INSERT INTO users (username, email, is_active) VALUES (?1, ?2, ?3)")
      .bind(username)
      .bind(email)
      .bind(is_active)
      .execute(pool)
      .await
      .expect("Failed to seed user");

  result.last_insert_rowid()
}

/// Insert a day record with the given flags. The cycle starts on the
/// record's own date and the streak snapshot is left at zero.
pub async fn seed_day_record(
  pool: &SqlitePool,
  user_id: i64,
  date: NaiveDate,
  workout: bool,
  diet: bool,
) -> i64 {
  let result = sqlx::query(
    "INSERT INTO day_records
       (user_id, date, workout_logged, diet_logged, streak_day, cycle_start)
     VALUES (?1, ?2, ?3, ?4, 0, ?5)",
  )
  .bind(user_id)
  .bind(date)
  .bind(workout)
  .bind(diet)
  .bind(date)
  .execute(pool)
  .await
  .expect("Failed to seed day record");

  result.last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Fake collaborators
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentNotification {
  pub user_id: i64,
  pub message: String,
  pub category: String,
}

/// Sink that records every dispatch for later assertions.
#[derive(Default)]
pub struct RecordingSink {
  sent: Mutex<Vec<SentNotification>>,
}

impl RecordingSink {
  pub fn sent(&self) -> Vec<SentNotification> {
    self.sent.lock().expect("sink mutex poisoned").clone()
  }
}

#[async_trait]
impl NotificationSink for RecordingSink {
  async fn dispatch(&self, user_id: i64, message: &str, category: &str) -> Result<()> {
    self
      .sent
      .lock()
      .expect("sink mutex poisoned")
      .push(SentNotification {
        user_id,
        message: message.to_string(),
        category: category.to_string(),
      });
    Ok(())
  }
}

/// Sink that rejects every dispatch.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
  async fn dispatch(&self, _user_id: i64, _message: &str, _category: &str) -> Result<()> {
    Err(CoreError::Dispatch("sink unavailable".to_string()))
  }
}

/// Clock pinned to a settable instant.
pub struct FixedClock {
  now: Mutex<NaiveDateTime>,
}

impl FixedClock {
  pub fn new(now: NaiveDateTime) -> Self {
    Self {
      now: Mutex::new(now),
    }
  }

  pub fn set(&self, now: NaiveDateTime) {
    *self.now.lock().expect("clock mutex poisoned") = now;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime {
    *self.now.lock().expect("clock mutex poisoned")
  }
}
