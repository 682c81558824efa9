//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters, and providing clear error messages
//! for misconfiguration.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable that overrides `notifier.webhook_url`.
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = resolve_config(&content, std::env::var(WEBHOOK_ENV).ok())?;

  info!(
    endpoints = config.endpoints.len(),
    interval_s = config.tracker.poll_interval_seconds,
    webhook = config.notifier.effective_webhook_url().is_some(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns error on malformed TOML or failed validation.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  resolve_config(content, None)
}

/// Parse TOML text, apply a webhook URL override, then validate.
///
/// The override goes through the same checks as a file value.
///
/// # Errors
/// Returns error on malformed TOML or failed validation.
pub fn resolve_config(content: &str, webhook_override: Option<String>) -> Result<AppConfig> {
  let mut config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  if let Some(url) = webhook_override {
    config.notifier.webhook_url = Some(url);
  }

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - At least one endpoint, each with a URL and a unique name
/// - A non-zero poll interval and request timeout
/// - A webhook URL that is HTTP(S) when set
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.tracker.name.trim().is_empty(),
    "tracker.name must not be empty"
  );
  anyhow::ensure!(
    config.tracker.poll_interval_seconds > 0,
    "tracker.poll_interval_seconds must be positive"
  );

  // Endpoint validation
  anyhow::ensure!(
    !config.endpoints.is_empty(),
    "At least one endpoint must be configured"
  );

  let mut names = HashSet::new();
  for (i, endpoint) in config.endpoints.iter().enumerate() {
    anyhow::ensure!(
      !endpoint.name.trim().is_empty(),
      "Endpoint {} has empty name",
      i
    );
    anyhow::ensure!(
      names.insert(endpoint.name.as_str()),
      "Endpoint name {} is used more than once",
      endpoint.name
    );
    anyhow::ensure!(
      endpoint.url.starts_with("http://") || endpoint.url.starts_with("https://"),
      "Endpoint {} ({}) has invalid url: {:?}",
      i,
      endpoint.name,
      endpoint.url
    );
  }

  // HTTP validation
  anyhow::ensure!(
    config.http.timeout_seconds > 0,
    "http.timeout_seconds must be positive"
  );
  anyhow::ensure!(
    config.http.max_retries <= 10,
    "http.max_retries must be at most 10, got {}",
    config.http.max_retries
  );

  // Notifier validation
  if let Some(url) = config.notifier.effective_webhook_url() {
    anyhow::ensure!(
      url.starts_with("https://") || url.starts_with("http://"),
      "notifier.webhook_url must be an http(s) URL"
    );
  }

  Ok(())
}
