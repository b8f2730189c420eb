//! Persistence collaborators: per-day record CRUD and the active-user
//! directory.
//!
//! The record store's only write path is an insert-or-update keyed on
//! (user_id, date), backed by the schema's UNIQUE constraint, so concurrent
//! get-or-create calls for the same day can never produce duplicate rows.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{CoreError, Result};
use crate::models::{ActiveUser, DayRecord, NewDayRecord};

#[async_trait]
pub trait RecordStore: Send + Sync {
  async fn find(&self, user_id: i64, date: NaiveDate) -> Result<Option<DayRecord>>;

  /// Most recent record by date value across all of the user's records.
  async fn find_latest(&self, user_id: i64) -> Result<Option<DayRecord>>;

  /// Records with `date` in `[start, end]` inclusive, ascending by date.
  async fn find_range(
    &self,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<DayRecord>>;

  /// All of the user's records, ascending by date.
  async fn find_all(&self, user_id: i64) -> Result<Vec<DayRecord>>;

  /// Insert the record, or update flags/streak/cycle in place when a row
  /// for (user_id, date) already exists. Returns the stored row.
  async fn upsert(&self, record: &NewDayRecord) -> Result<DayRecord>;
}

pub struct SqliteRecordStore {
  pool: SqlitePool,
}

impl SqliteRecordStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
  async fn find(&self, user_id: i64, date: NaiveDate) -> Result<Option<DayRecord>> {
    let record = sqlx::query_as::<_, DayRecord>(
      "SELECT id, user_id, date, workout_logged, diet_logged, streak_day, cycle_start
       FROM day_records WHERE user_id = ?1 AND date = ?2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(&self.pool)
    .await?;

    Ok(record)
  }

  async fn find_latest(&self, user_id: i64) -> Result<Option<DayRecord>> {
    let record = sqlx::query_as::<_, DayRecord>(
      "SELECT id, user_id, date, workout_logged, diet_logged, streak_day, cycle_start
       FROM day_records WHERE user_id = ?1 ORDER BY date DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(record)
  }

  async fn find_range(
    &self,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<DayRecord>> {
    let records = sqlx::query_as::<_, DayRecord>(
      "SELECT id, user_id, date, workout_logged, diet_logged, streak_day, cycle_start
       FROM day_records WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
       ORDER BY date ASC",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(&self.pool)
    .await?;

    Ok(records)
  }

  async fn find_all(&self, user_id: i64) -> Result<Vec<DayRecord>> {
    let records = sqlx::query_as::<_, DayRecord>(
      "SELECT id, user_id, date, workout_logged, diet_logged, streak_day, cycle_start
       FROM day_records WHERE user_id = ?1 ORDER BY date ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(records)
  }

  async fn upsert(&self, record: &NewDayRecord) -> Result<DayRecord> {
    sqlx::query(
      r#"
      INSERT INTO day_records
        (user_id, date, workout_logged, diet_logged, streak_day, cycle_start)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      ON CONFLICT (user_id, date) DO UPDATE SET
        workout_logged = excluded.workout_logged,
        diet_logged = excluded.diet_logged,
        streak_day = excluded.streak_day,
        cycle_start = excluded.cycle_start
      "#,
    )
    .bind(record.user_id)
    .bind(record.date)
    .bind(record.workout_logged)
    .bind(record.diet_logged)
    .bind(record.streak_day)
    .bind(record.cycle_start)
    .execute(&self.pool)
    .await?;

    self
      .find(record.user_id, record.date)
      .await?
      .ok_or(CoreError::Database(sqlx::Error::RowNotFound))
  }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
  /// Users eligible for reminder sweeps.
  async fn list_active(&self) -> Result<Vec<ActiveUser>>;

  async fn find(&self, user_id: i64) -> Result<Option<ActiveUser>>;
}

pub struct SqliteUserDirectory {
  pool: SqlitePool,
}

impl SqliteUserDirectory {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
  async fn list_active(&self) -> Result<Vec<ActiveUser>> {
    let users = sqlx::query_as::<_, ActiveUser>(
      "SELECT id, username, email FROM users WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(users)
  }

  async fn find(&self, user_id: i64) -> Result<Option<ActiveUser>> {
    let user = sqlx::query_as::<_, ActiveUser>(
      "SELECT id, username, email FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(user)
  }
}
