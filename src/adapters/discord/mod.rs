//! Discord Adapter
//!
//! Sub-modules:
//! - `embed`: Webhook payload types and summary-to-embed mapping
//! - `webhook`: `Notifier` implementation posting to a webhook URL

pub mod embed;
pub mod webhook;

pub use webhook::DiscordWebhook;
