use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::Result;

pub type DbPool = SqlitePool;

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool> {
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!(database_url, "database ready");

  Ok(pool)
}
