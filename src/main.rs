//! Long-running reminder daemon: wires the SQLite-backed engine to the
//! scheduler and runs until interrupted.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use consistency_coach::clock::SystemClock;
use consistency_coach::config::Config;
use consistency_coach::db;
use consistency_coach::notify::{LogSink, NotificationSink, WebhookSink};
use consistency_coach::scheduler::{ReminderScheduler, SweepContext};
use consistency_coach::store::{SqliteRecordStore, SqliteUserDirectory};
use consistency_coach::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let pool = db::initialize_db(&config.database_url).await?;

    let sink: Arc<dyn NotificationSink> = match config.webhook_url.clone() {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "dispatching notifications to webhook");
            Arc::new(WebhookSink::new(endpoint))
        }
        None => {
            tracing::info!("no webhook configured, notifications go to the log");
            Arc::new(LogSink)
        }
    };

    let ctx = SweepContext {
        store: Arc::new(SqliteRecordStore::new(pool.clone())),
        users: Arc::new(SqliteUserDirectory::new(pool)),
        sink,
        clock: Arc::new(SystemClock),
    };

    let scheduler = ReminderScheduler::new(ctx);
    scheduler.start().await;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }

    tracing::info!("shutdown requested");
    scheduler.stop().await;

    Ok(())
}
