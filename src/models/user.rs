use serde::{Deserialize, Serialize};

/// A user eligible for reminder sweeps. Credential fields live outside this
/// service; only what the sweeps and achievement messages need is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActiveUser {
  pub id: i64,
  pub username: String,
  pub email: String,
}
