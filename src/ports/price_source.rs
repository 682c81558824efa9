//! Price Source Port - Upstream Listing Retrieval
//!
//! One call fetches one endpoint and returns its decoded JSON body.
//! Shape interpretation is left to the domain layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::EndpointConfig;

/// Trait for upstream marketplace fetchers.
///
/// Implementors perform exactly one HTTP round trip (plus retries)
/// per call and never inspect the payload beyond JSON decoding.
#[async_trait]
pub trait PriceSource: Send + Sync + 'static {
  /// Fetch the current listing payload for `endpoint`.
  ///
  /// # Errors
  /// Returns error on transport failure, non-2xx status, or a body
  /// that is not valid JSON.
  async fn fetch(&self, endpoint: &EndpointConfig) -> anyhow::Result<Value>;
}
