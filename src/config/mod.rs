//! Configuration Module - TOML-based Tracker Configuration
//!
//! Loads and validates configuration from `config.toml`, with the
//! webhook URL overridable from the `DISCORD_WEBHOOK_URL` environment
//! variable. Endpoint URLs, referers and headers live here; the
//! domain layer never sees them.

pub mod loader;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::offer::{Side, Source};

/// Top-level tracker configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the first poll cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Tracker identity and scheduling.
  pub tracker: TrackerConfig,
  /// Outbound HTTP client settings.
  #[serde(default)]
  pub http: HttpConfig,
  /// Summary delivery.
  #[serde(default)]
  pub notifier: NotifierConfig,
  /// Upstream endpoints, fetched in order every cycle.
  pub endpoints: Vec<EndpointConfig>,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Tracker identity and scheduling.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
  /// Human-readable tracker name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Seconds between the start of consecutive poll cycles.
  #[serde(default = "default_poll_interval")]
  pub poll_interval_seconds: u64,
  /// Summary title.
  #[serde(default = "default_title")]
  pub title: String,
}

/// Outbound HTTP client settings, shared by fetching and delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
  /// Browser User-Agent sent with every request.
  #[serde(default = "default_user_agent")]
  pub user_agent: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
  /// Retries on transport errors, 429 and 5xx.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff), milliseconds.
  #[serde(default = "default_retry_delay")]
  pub retry_base_delay_ms: u64,
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      user_agent: default_user_agent(),
      timeout_seconds: default_timeout(),
      max_retries: default_max_retries(),
      retry_base_delay_ms: default_retry_delay(),
    }
  }
}

/// Summary delivery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
  /// Discord webhook URL. Unset, empty or placeholder selects console output.
  #[serde(default)]
  pub webhook_url: Option<String>,
  /// Embed footer text.
  #[serde(default = "default_footer")]
  pub footer: String,
  /// Optional webhook username override.
  #[serde(default)]
  pub username: Option<String>,
}

impl Default for NotifierConfig {
  fn default() -> Self {
    Self {
      webhook_url: None,
      footer: default_footer(),
      username: None,
    }
  }
}

impl NotifierConfig {
  /// The webhook URL if it is set to something that looks real.
  pub fn effective_webhook_url(&self) -> Option<&str> {
    self
      .webhook_url
      .as_deref()
      .map(str::trim)
      .filter(|url| !url.is_empty() && !is_placeholder(url))
  }
}

/// One upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointConfig {
  /// Name used in logs and metrics.
  pub name: String,
  /// Which marketplace shape to expect.
  pub source: Source,
  /// Which side the listing represents.
  pub side: Side,
  /// API URL.
  pub url: String,
  /// Referer header (the human-facing page the API backs).
  pub referer: String,
  /// Extra static headers.
  #[serde(default)]
  pub headers: BTreeMap<String, String>,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      bind_address: default_metrics_addr(),
      health_port: default_health_port(),
    }
  }
}

fn is_placeholder(url: &str) -> bool {
  let upper = url.to_ascii_uppercase();
  upper.contains("YOUR") && upper.contains("WEBHOOK")
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_poll_interval() -> u64 {
  30 * 60
}

fn default_title() -> String {
  crate::domain::summary::DEFAULT_TITLE.to_string()
}

fn default_user_agent() -> String {
  "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
   Chrome/136.0.0.0 Safari/537.36 Edg/136.0.0.0"
    .to_string()
}

fn default_timeout() -> u64 {
  30
}

fn default_max_retries() -> u32 {
  2
}

fn default_retry_delay() -> u64 {
  500
}

fn default_footer() -> String {
  "Data updated every 30 minutes.".to_string()
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_health_port() -> u16 {
  8080
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_placeholder_webhook_ignored() {
    let mut notifier = NotifierConfig {
      webhook_url: Some("YOUR DISCORD WEBHOOK URL HERE".to_string()),
      ..NotifierConfig::default()
    };
    assert_eq!(notifier.effective_webhook_url(), None);

    notifier.webhook_url = Some("   ".to_string());
    assert_eq!(notifier.effective_webhook_url(), None);

    notifier.webhook_url = Some("https://discord.com/api/webhooks/1/abc".to_string());
    assert_eq!(
      notifier.effective_webhook_url(),
      Some("https://discord.com/api/webhooks/1/abc")
    );
  }
}
