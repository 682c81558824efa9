//! Console Notifier - Log-only Summary Delivery
//!
//! Used when no webhook URL is configured: every rendered line goes
//! to the structured log instead of a chat channel.

use async_trait::async_trait;
use tracing::info;

use crate::domain::summary::Summary;
use crate::ports::notifier::Notifier;

/// `Notifier` that writes the summary to the log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
  pub const fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
  fn name(&self) -> &str {
    "console"
  }

  async fn deliver(&self, summary: &Summary) -> anyhow::Result<()> {
    info!(title = %summary.title, timestamp = %summary.timestamp, "Price summary");

    if let Some(description) = summary.description() {
      info!(description, "No offers to report");
      return Ok(());
    }

    for section in &summary.sections {
      info!(section = %section.heading, best = %section.best_line, "Best offer");
      for line in &section.top_lines {
        info!(section = %section.heading, line = %line, "Ranked offer");
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::summary::{render, DEFAULT_TITLE};

  #[tokio::test]
  async fn test_console_delivery_never_fails() {
    let notifier = ConsoleNotifier::new();
    let summary = render(&[], DEFAULT_TITLE);
    assert!(notifier.deliver(&summary).await.is_ok());
    assert_eq!(notifier.name(), "console");
  }
}
