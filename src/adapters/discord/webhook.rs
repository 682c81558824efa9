//! Discord Webhook Notifier
//!
//! Posts the rendered summary as a single embed. Delivery is attempted
//! once per cycle; failures surface as errors for the cycle to log.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument};

use super::embed::webhook_payload;
use crate::adapters::http::HttpClient;
use crate::config::NotifierConfig;
use crate::domain::summary::Summary;
use crate::ports::notifier::Notifier;

/// `Notifier` that posts to a Discord webhook.
pub struct DiscordWebhook {
  client: Arc<HttpClient>,
  url: String,
  footer: String,
  username: Option<String>,
}

impl DiscordWebhook {
  /// Create a webhook notifier sharing `client`.
  pub fn new(client: Arc<HttpClient>, url: impl Into<String>, config: &NotifierConfig) -> Self {
    Self {
      client,
      url: url.into(),
      footer: config.footer.clone(),
      username: config.username.clone(),
    }
  }
}

#[async_trait]
impl Notifier for DiscordWebhook {
  fn name(&self) -> &str {
    "discord"
  }

  #[instrument(skip(self, summary), fields(sections = summary.sections.len()))]
  async fn deliver(&self, summary: &Summary) -> Result<()> {
    let payload = webhook_payload(summary, &self.footer, self.username.as_deref());

    self
      .client
      .post_json(&self.url, &payload)
      .await
      .context("Discord webhook rejected the summary")?;

    info!("Summary sent to Discord");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::HttpClientConfig;
  use crate::domain::summary::{render, DEFAULT_TITLE};

  #[test]
  fn test_unreachable_webhook_is_an_error() {
    let client = Arc::new(HttpClient::new(HttpClientConfig::default()).unwrap());
    let notifier = DiscordWebhook::new(
      client,
      "http://127.0.0.1:1/api/webhooks/0/token",
      &NotifierConfig::default(),
    );
    assert_eq!(notifier.name(), "discord");

    let summary = render(&[], DEFAULT_TITLE);
    let result = tokio_test::block_on(notifier.deliver(&summary));
    assert!(result.is_err());
  }
}
