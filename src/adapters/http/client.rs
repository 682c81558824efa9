//! Shared HTTP Client - Browser-like REST Client with Retries
//!
//! Wraps reqwest with static browser headers, a request timeout and
//! bounded exponential-backoff retries. One instance is built in
//! `main` and handed to both the fetcher and the webhook notifier.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::domain::excerpt::{excerpt_str, BODY_EXCERPT_CHARS};

/// Configuration for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
  /// Browser User-Agent sent with every request.
  pub user_agent: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum retries on transient errors (GET only).
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for HttpClientConfig {
  fn default() -> Self {
    Self::from(&HttpConfig::default())
  }
}

impl From<&HttpConfig> for HttpClientConfig {
  fn from(config: &HttpConfig) -> Self {
    Self {
      user_agent: config.user_agent.clone(),
      timeout: Duration::from_secs(config.timeout_seconds),
      max_retries: config.max_retries,
      retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
    }
  }
}

/// HTTP client shared by every outbound call of the tracker.
pub struct HttpClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: HttpClientConfig,
}

impl HttpClient {
  /// Create a new client.
  pub fn new(config: HttpClientConfig) -> Result<Self> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
      USER_AGENT,
      HeaderValue::from_str(&config.user_agent).context("Invalid User-Agent header")?,
    );

    let http = Client::builder()
      .timeout(config.timeout)
      .default_headers(default_headers)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  /// GET `url` with extra headers, retrying transient failures.
  pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response> {
    let request = self.http.get(url).headers(headers);
    self
      .execute_with_retry(request, "GET", url, self.config.max_retries)
      .await
  }

  /// POST `body` as JSON to `url`. Never retried.
  pub async fn post_json<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<Response> {
    let payload = serde_json::to_vec(body).context("Failed to serialize request body")?;
    let request = self
      .http
      .post(url)
      .header(CONTENT_TYPE, "application/json")
      .body(payload);
    self.execute_with_retry(request, "POST", url, 0).await
  }

  /// Execute request with retries on transport errors, 429 and 5xx.
  async fn execute_with_retry(
    &self,
    request: RequestBuilder,
    method: &str,
    url: &str,
    max_retries: u32,
  ) -> Result<Response> {
    let mut last_error = None;

    for attempt in 0..=max_retries {
      if attempt > 0 {
        let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
        debug!(attempt, delay_ms = delay.as_millis(), method, url, "Retrying request");
        sleep(delay).await;
      }

      let req = request
        .try_clone()
        .context("Failed to clone request")?;

      match req.send().await {
        Ok(response) => match response.status() {
          status if status.is_success() => return Ok(response),
          status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
            warn!(status = %status, method, url, attempt, "Transient HTTP error");
            last_error = Some(status_error(status, response).await);
          }
          status => return Err(status_error(status, response).await),
        },
        Err(e) => {
          warn!(error = %e, method, url, attempt, "Request failed");
          last_error = Some(anyhow::Error::new(e).context(format!("{method} {url} failed")));
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded for {method} {url}")))
  }
}

/// Build an error carrying the status and a truncated response body.
async fn status_error(status: StatusCode, response: Response) -> anyhow::Error {
  let body = response.text().await.unwrap_or_default();
  anyhow::anyhow!(
    "HTTP {status}: {}",
    excerpt_str(&body, BODY_EXCERPT_CHARS)
  )
}

/// Build a header map from string pairs, skipping invalid entries.
pub fn header_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> HeaderMap {
  let mut headers = HeaderMap::new();
  for (name, value) in pairs {
    match (
      HeaderName::from_bytes(name.as_bytes()),
      HeaderValue::from_str(value),
    ) {
      (Ok(name), Ok(value)) => {
        headers.insert(name, value);
      }
      _ => warn!(header = name, "Skipping invalid header"),
    }
  }
  headers
}
