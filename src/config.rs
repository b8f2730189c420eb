//! Environment-based configuration.

use std::env;

use url::Url;

use crate::error::{CoreError, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://consistency.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  /// When set, notifications POST to this endpoint; otherwise they are
  /// logged only.
  pub webhook_url: Option<Url>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let database_url =
      env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let webhook_url = match env::var("NOTIFY_WEBHOOK_URL") {
      Ok(raw) => Some(Url::parse(&raw).map_err(|e| {
        CoreError::InvalidConfig(format!("NOTIFY_WEBHOOK_URL: {}", e))
      })?),
      Err(_) => None,
    };

    Ok(Self {
      database_url,
      webhook_url,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn defaults_apply_when_env_is_empty() {
    temp_env::with_vars(
      [
        ("DATABASE_URL", None::<&str>),
        ("NOTIFY_WEBHOOK_URL", None::<&str>),
      ],
      || {
        let config = Config::from_env().expect("config should load");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert!(config.webhook_url.is_none());
      },
    );
  }

  #[test]
  #[serial]
  fn webhook_url_is_parsed_when_present() {
    temp_env::with_vars(
      [("NOTIFY_WEBHOOK_URL", Some("https://hooks.example.com/notify"))],
      || {
        let config = Config::from_env().expect("config should load");
        let url = config.webhook_url.expect("webhook url should be set");
        assert_eq!(url.host_str(), Some("hooks.example.com"));
      },
    );
  }

  #[test]
  #[serial]
  fn invalid_webhook_url_is_rejected() {
    temp_env::with_vars([("NOTIFY_WEBHOOK_URL", Some("not a url"))], || {
      let err = Config::from_env().unwrap_err();
      assert!(err.to_string().contains("NOTIFY_WEBHOOK_URL"));
    });
  }
}
