//! HTTP Adapter
//!
//! Sub-modules:
//! - `client`: Shared reqwest client with browser headers and retries
//! - `fetcher`: `PriceSource` implementation for marketplace endpoints

pub mod client;
pub mod fetcher;

pub use client::{HttpClient, HttpClientConfig};
pub use fetcher::HttpPriceSource;
