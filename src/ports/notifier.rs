//! Notifier Port - Summary Delivery
//!
//! Delivery is fire-and-forget per cycle: a failed delivery is logged
//! by the caller and the next cycle sends fresh data.

use async_trait::async_trait;

use crate::domain::summary::Summary;

/// Trait for summary delivery channels (Discord webhook, console).
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
  /// Short channel name for logs.
  fn name(&self) -> &str;

  /// Deliver one rendered summary.
  ///
  /// # Errors
  /// Returns error if the channel rejects the message or is unreachable.
  async fn deliver(&self, summary: &Summary) -> anyhow::Result<()>;
}
