//! 30-day cycle boundary management.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{DayRecord, NewDayRecord};
use crate::store::RecordStore;

/// Length of one consistency cycle in days.
pub const CYCLE_LENGTH_DAYS: i64 = 30;

/// Fetch the record for `target_date`, creating it when absent.
///
/// A created record inherits `cycle_start` from the user's most recent
/// record (most recent by max date value, wherever that falls relative to
/// `target_date`) as long as the gap from that cycle start is under 30
/// days. At 30 days or more (or with no prior cycle) a new cycle begins at
/// `target_date`. Note the max-date lookup means backfilling a past date can
/// inherit a boundary from a later record; that matches the shipped
/// behavior and is pinned by a test below.
pub async fn get_or_create_record(
  store: &dyn RecordStore,
  user_id: i64,
  target_date: NaiveDate,
) -> Result<DayRecord> {
  if let Some(existing) = store.find(user_id, target_date).await? {
    return Ok(existing);
  }

  let mut cycle_start = target_date;
  if let Some(latest) = store.find_latest(user_id).await? {
    if let Some(prior_start) = latest.cycle_start {
      let gap = (target_date - prior_start).num_days();
      if gap < CYCLE_LENGTH_DAYS {
        cycle_start = prior_start;
      }
    }
  }

  store
    .upsert(&NewDayRecord::blank(user_id, target_date, cycle_start))
    .await
}

/// Force a fresh cycle starting today, overriding any prior boundary. This
/// is the explicit reset action, distinct from the automatic 30-day
/// rollover in `get_or_create_record`.
pub async fn reset_cycle(
  store: &dyn RecordStore,
  user_id: i64,
  today: NaiveDate,
) -> Result<NaiveDate> {
  let record = get_or_create_record(store, user_id, today).await?;

  let mut update = NewDayRecord::from(&record);
  update.cycle_start = Some(today);
  store.upsert(&update).await?;

  Ok(today)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::SqliteRecordStore;
  use crate::test_utils::{seed_test_user, setup_test_db, teardown_test_db};
  use chrono::Duration;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
  }

  #[tokio::test]
  async fn first_record_starts_its_own_cycle() {
    let pool = setup_test_db().await;
    let user_id = seed_test_user(&pool, "ana", "ana@example.com", true).await;
    let store = SqliteRecordStore::new(pool.clone());

    let day = date(2025, 6, 1);
    let record = get_or_create_record(&store, user_id, day).await.unwrap();

    assert_eq!(record.date, day);
    assert_eq!(record.cycle_start, Some(day));
    assert!(!record.workout_logged);
    assert!(!record.diet_logged);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn existing_record_is_returned_unchanged() {
    let pool = setup_test_db().await;
    let user_id = seed_test_user(&pool, "ben", "ben@example.com", true).await;
    let store = SqliteRecordStore::new(pool.clone());

    let day = date(2025, 6, 1);
    let first = get_or_create_record(&store, user_id, day).await.unwrap();
    let mut update = NewDayRecord::from(&first);
    update.workout_logged = true;
    store.upsert(&update).await.unwrap();

    let again = get_or_create_record(&store, user_id, day).await.unwrap();
    assert_eq!(again.id, first.id);
    assert!(again.workout_logged, "existing flags must survive");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn new_record_inherits_cycle_start_under_30_days() {
    let pool = setup_test_db().await;
    let user_id = seed_test_user(&pool, "cam", "cam@example.com", true).await;
    let store = SqliteRecordStore::new(pool.clone());

    let cycle_start = date(2025, 6, 1);
    get_or_create_record(&store, user_id, cycle_start).await.unwrap();

    // Gap of 29 days: still inside the cycle.
    let target = cycle_start + Duration::days(29);
    let record = get_or_create_record(&store, user_id, target).await.unwrap();
    assert_eq!(record.cycle_start, Some(cycle_start));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn cycle_restarts_at_the_30_day_boundary() {
    let pool = setup_test_db().await;
    let user_id = seed_test_user(&pool, "dia", "dia@example.com", true).await;
    let store = SqliteRecordStore::new(pool.clone());

    let cycle_start = date(2025, 6, 1);
    get_or_create_record(&store, user_id, cycle_start).await.unwrap();

    // Gap of exactly 30 days rolls over.
    let target = cycle_start + Duration::days(30);
    let record = get_or_create_record(&store, user_id, target).await.unwrap();
    assert_eq!(record.cycle_start, Some(target));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn reset_cycle_overrides_any_prior_boundary() {
    let pool = setup_test_db().await;
    let user_id = seed_test_user(&pool, "eli", "eli@example.com", true).await;
    let store = SqliteRecordStore::new(pool.clone());

    let cycle_start = date(2025, 6, 1);
    get_or_create_record(&store, user_id, cycle_start).await.unwrap();

    let today = date(2025, 6, 10);
    get_or_create_record(&store, user_id, today).await.unwrap();

    let new_start = reset_cycle(&store, user_id, today).await.unwrap();
    assert_eq!(new_start, today);

    let record = store.find(user_id, today).await.unwrap().unwrap();
    assert_eq!(record.cycle_start, Some(today));

    teardown_test_db(pool).await;
  }

  /// Pins the max-date lookup quirk: backfilling a date before existing
  /// records inherits the latest record's cycle_start, even though that
  /// boundary lies after the backfilled date.
  #[tokio::test]
  async fn backfill_inherits_cycle_from_latest_record() {
    let pool = setup_test_db().await;
    let user_id = seed_test_user(&pool, "fin", "fin@example.com", true).await;
    let store = SqliteRecordStore::new(pool.clone());

    let later = date(2025, 6, 20);
    get_or_create_record(&store, user_id, later).await.unwrap();

    let backfilled = date(2025, 6, 5);
    let record = get_or_create_record(&store, user_id, backfilled).await.unwrap();
    assert_eq!(
      record.cycle_start,
      Some(later),
      "backfill takes the boundary from the max-date record"
    );

    teardown_test_db(pool).await;
  }
}
