//! Marketplace Fetcher - `PriceSource` over the shared HTTP client
//!
//! Sends the XHR-style headers the marketplace pages send themselves
//! (JSON accept, `X-Requested-With`, page referer) plus any static
//! headers configured for the endpoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::{header_map, HttpClient};
use crate::config::EndpointConfig;
use crate::ports::price_source::PriceSource;

/// Accept header sent on every listing request.
const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";

/// Fetches listing payloads over HTTP.
pub struct HttpPriceSource {
  client: Arc<HttpClient>,
}

impl HttpPriceSource {
  /// Create a fetcher sharing `client`.
  pub fn new(client: Arc<HttpClient>) -> Self {
    Self { client }
  }
}

/// Headers for one endpoint. Configured headers override the defaults.
pub fn request_headers(endpoint: &EndpointConfig) -> reqwest::header::HeaderMap {
  let defaults = [
    ("Accept", ACCEPT_JSON),
    ("X-Requested-With", "XMLHttpRequest"),
    ("Referer", endpoint.referer.as_str()),
  ];
  let extra = endpoint
    .headers
    .iter()
    .map(|(name, value)| (name.as_str(), value.as_str()));
  header_map(defaults.into_iter().chain(extra))
}

#[async_trait]
impl PriceSource for HttpPriceSource {
  #[instrument(skip(self, endpoint), fields(endpoint = %endpoint.name))]
  async fn fetch(&self, endpoint: &EndpointConfig) -> Result<Value> {
    debug!(url = %endpoint.url, referer = %endpoint.referer, "Fetching listing");

    let response = self
      .client
      .get(&endpoint.url, request_headers(endpoint))
      .await
      .with_context(|| format!("Fetch failed for endpoint {}", endpoint.name))?;

    response
      .json::<Value>()
      .await
      .with_context(|| format!("Endpoint {} returned invalid JSON", endpoint.name))
  }
}
