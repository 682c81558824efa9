//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, Discord webhook, log output).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `http`: Shared HTTP client and the marketplace fetcher
//! - `discord`: Webhook notifier and embed payloads
//! - `console`: Log-only notifier for runs without a webhook
//! - `metrics`: Prometheus metrics export and health checks

pub mod console;
pub mod discord;
pub mod http;
pub mod metrics;
