//! Shared error taxonomy for the consistency engine.
//!
//! Validation errors are raised before any store access; store errors
//! propagate to the caller. Sweep-level code catches per-user errors itself
//! (see `scheduler`), so nothing here carries retry semantics.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
  #[error("Invalid date '{0}': expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("Invalid activity type '{0}': must be \"workout\" or \"diet\"")]
  InvalidActivity(String),

  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Notification dispatch failed: {0}")]
  Dispatch(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
