//! Poll Scheduler - Fixed-interval Cycle Ticker
//!
//! Invokes a `Cycle` immediately and then once per interval until
//! shutdown. A cycle that overruns the interval delays the next tick
//! instead of triggering a burst of catch-up cycles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument};

use crate::adapters::metrics::HealthState;

/// One unit of scheduled work.
#[async_trait]
pub trait Cycle: Send + Sync {
  /// Run one cycle to completion. Must not fail.
  async fn run_cycle(&self);
}

/// Runs a `Cycle` on a fixed interval.
pub struct PollScheduler {
  /// Time between cycle starts.
  interval: Duration,
  /// Health state updated after every cycle.
  health: Option<Arc<HealthState>>,
}

impl PollScheduler {
  /// Create a scheduler ticking every `interval`.
  pub fn new(interval: Duration) -> Self {
    Self {
      interval,
      health: None,
    }
  }

  /// Report completed cycles to `health`.
  pub fn with_health(mut self, health: Arc<HealthState>) -> Self {
    self.health = Some(health);
    self
  }

  /// Run cycles until `shutdown_rx` fires or its sender is dropped.
  ///
  /// A cycle already in progress is allowed to finish. Returns the
  /// number of cycles run.
  #[instrument(skip(self, cycle, shutdown_rx), fields(interval_s = self.interval.as_secs()))]
  pub async fn run<C: Cycle + ?Sized>(
    &self,
    cycle: &C,
    mut shutdown_rx: broadcast::Receiver<()>,
  ) -> u64 {
    let mut ticker = tokio::time::interval(self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Scheduler started");
    let mut cycles = 0u64;

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!(cycles, "Scheduler received shutdown signal");
          break;
        }
        _ = ticker.tick() => {
          info!(cycle = cycles + 1, "Starting scrape cycle");
          cycle.run_cycle().await;
          cycles += 1;

          if let Some(health) = &self.health {
            health.record_cycle();
          }

          let next_run = Utc::now()
            + chrono::Duration::from_std(self.interval).unwrap_or_else(|_| chrono::Duration::zero());
          info!(next_run = %next_run.format("%Y-%m-%d %H:%M:%S"), "Cycle finished, waiting for next run");
        }
      }
    }

    cycles
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU64, Ordering};

  /// Counts runs and requests shutdown after `stop_after`.
  struct CountingCycle {
    runs: AtomicU64,
    stop_after: u64,
    shutdown_tx: broadcast::Sender<()>,
  }

  #[async_trait]
  impl Cycle for CountingCycle {
    async fn run_cycle(&self) {
      let n = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
      if n == self.stop_after {
        let _ = self.shutdown_tx.send(());
      }
    }
  }

  #[tokio::test]
  async fn test_runs_until_shutdown() {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let cycle = CountingCycle {
      runs: AtomicU64::new(0),
      stop_after: 3,
      shutdown_tx,
    };
    let health = Arc::new(HealthState::new());
    let scheduler = PollScheduler::new(Duration::from_millis(5)).with_health(Arc::clone(&health));

    let ran = scheduler.run(&cycle, shutdown_rx).await;

    assert_eq!(ran, 3);
    assert_eq!(cycle.runs.load(Ordering::SeqCst), 3);
    assert_eq!(health.cycles_completed(), 3);
  }

  #[tokio::test]
  async fn test_shutdown_before_first_tick() {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    shutdown_tx.send(()).unwrap();
    let cycle = CountingCycle {
      runs: AtomicU64::new(0),
      stop_after: 0,
      shutdown_tx: shutdown_tx.clone(),
    };

    let ran = PollScheduler::new(Duration::from_secs(3600))
      .run(&cycle, shutdown_rx)
      .await;

    assert_eq!(ran, 0);
  }
}
