//! Notification delivery.
//!
//! The engine talks to a `NotificationSink` trait so sweeps and the service
//! never know whether messages land in the log or on a webhook. Both
//! provided sinks are fire-and-forget per call; retry policy stays with the
//! caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::{CoreError, Result};

pub const CATEGORY_DAILY_REMINDER: &str = "daily_reminder";
pub const CATEGORY_WEEKLY_MOTIVATION: &str = "weekly_motivation";
pub const CATEGORY_ACHIEVEMENT: &str = "achievement";

#[async_trait]
pub trait NotificationSink: Send + Sync {
  async fn dispatch(&self, user_id: i64, message: &str, category: &str) -> Result<()>;
}

/// Default sink: writes notifications to the structured log. Used when no
/// webhook endpoint is configured.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
  async fn dispatch(&self, user_id: i64, message: &str, category: &str) -> Result<()> {
    tracing::info!(user_id, category, message, "notification");
    Ok(())
  }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
  user_id: i64,
  message: &'a str,
  category: &'a str,
}

/// Posts each notification as JSON to a configured endpoint.
pub struct WebhookSink {
  client: Client,
  endpoint: Url,
}

impl WebhookSink {
  pub fn new(endpoint: Url) -> Self {
    Self {
      client: Client::new(),
      endpoint,
    }
  }
}

#[async_trait]
impl NotificationSink for WebhookSink {
  async fn dispatch(&self, user_id: i64, message: &str, category: &str) -> Result<()> {
    let payload = WebhookPayload {
      user_id,
      message,
      category,
    };

    let response = self
      .client
      .post(self.endpoint.clone())
      .json(&payload)
      .send()
      .await
      .map_err(|e| CoreError::Dispatch(format!("webhook request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(CoreError::Dispatch(format!(
        "webhook returned {}",
        response.status()
      )));
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn log_sink_always_accepts() {
    let sink = LogSink;
    sink
      .dispatch(1, "hello", CATEGORY_DAILY_REMINDER)
      .await
      .expect("log sink never fails");
  }

  #[tokio::test]
  async fn webhook_sink_posts_the_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/notify")
      .match_header("content-type", "application/json")
      .match_body(mockito::Matcher::JsonString(
        r#"{"user_id":7,"message":"keep going","category":"achievement"}"#.to_string(),
      ))
      .with_status(204)
      .create_async()
      .await;

    let endpoint = Url::parse(&format!("{}/notify", server.url())).unwrap();
    let sink = WebhookSink::new(endpoint);

    sink
      .dispatch(7, "keep going", CATEGORY_ACHIEVEMENT)
      .await
      .expect("dispatch should succeed");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn webhook_sink_surfaces_server_errors() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/notify")
      .with_status(500)
      .create_async()
      .await;

    let endpoint = Url::parse(&format!("{}/notify", server.url())).unwrap();
    let sink = WebhookSink::new(endpoint);

    let err = sink
      .dispatch(7, "keep going", CATEGORY_DAILY_REMINDER)
      .await
      .unwrap_err();
    assert!(matches!(err, CoreError::Dispatch(_)));
  }
}
