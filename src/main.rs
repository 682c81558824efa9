//! OSRS Gold Tracker - Entry Point
//!
//! Initializes configuration, logging and the shared HTTP client,
//! then runs the poll scheduler until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (path from argv) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create the shared HttpClient (browser headers + retry)
//! 4. Create HttpPriceSource (implements PriceSource port)
//! 5. Pick DiscordWebhook or ConsoleNotifier (implements Notifier port)
//! 6. Spawn metrics server and health server (/live + /ready)
//! 7. Spawn PollScheduler driving TrackerCycle
//! 8. Wait for SIGINT, then graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use osrs_gold_tracker::adapters::console::ConsoleNotifier;
use osrs_gold_tracker::adapters::discord::DiscordWebhook;
use osrs_gold_tracker::adapters::http::{HttpClient, HttpClientConfig, HttpPriceSource};
use osrs_gold_tracker::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use osrs_gold_tracker::config::{self, AppConfig};
use osrs_gold_tracker::ports::notifier::Notifier;
use osrs_gold_tracker::usecases::{PollScheduler, TrackerCycle};

/// Config path used when none is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
  // ── 1. Load configuration ───────────────────────────────
  let config_path = std::env::args()
    .nth(1)
    .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
  let config = config::loader::load_config(&config_path)
    .with_context(|| format!("Failed to load configuration from {config_path}"))?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.tracker.log_level)),
    )
    .json()
    .init();

  info!(
    name = %config.tracker.name,
    version = env!("CARGO_PKG_VERSION"),
    endpoints = config.endpoints.len(),
    interval_s = config.tracker.poll_interval_seconds,
    "Starting OSRS Gold Tracker"
  );

  // ── 3. Shared HTTP client ───────────────────────────────
  let client = Arc::new(
    HttpClient::new(HttpClientConfig::from(&config.http))
      .context("Failed to create HTTP client")?,
  );

  // ── 4. Price source (PriceSource port) ──────────────────
  let source = Arc::new(HttpPriceSource::new(Arc::clone(&client)));

  // ── 5. Notifier (Notifier port) ─────────────────────────
  match config.notifier.effective_webhook_url().map(str::to_string) {
    Some(url) => {
      info!("Delivering summaries to Discord webhook");
      let notifier = Arc::new(DiscordWebhook::new(Arc::clone(&client), url, &config.notifier));
      run(config, source, notifier).await
    }
    None => {
      warn!("No webhook configured, summaries will be logged only");
      run(config, source, Arc::new(ConsoleNotifier::new())).await
    }
  }
}

/// Spawn servers and the scheduler, then wait for SIGINT.
async fn run<N: Notifier>(
  config: AppConfig,
  source: Arc<HttpPriceSource>,
  notifier: Arc<N>,
) -> Result<()> {
  let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
  let health = Arc::new(HealthState::new());

  let mut cycle = TrackerCycle::new(
    source,
    notifier,
    config.endpoints.clone(),
    config.tracker.title.clone(),
  );

  // ── 6. Metrics + health servers ─────────────────────────
  let mut server_handles = Vec::new();
  if config.metrics.enabled {
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to create metrics registry")?);
    cycle = cycle.with_metrics(Arc::clone(&metrics));

    let metrics_shutdown = shutdown_tx.subscribe();
    let bind_address = config.metrics.bind_address.clone();
    server_handles.push(tokio::spawn(async move {
      if let Err(e) = metrics.serve(bind_address, metrics_shutdown).await {
        error!(error = %e, "Metrics server failed");
      }
    }));

    let health_server = HealthServer::new(Arc::clone(&health), config.metrics.health_port);
    let health_shutdown = shutdown_tx.subscribe();
    server_handles.push(tokio::spawn(async move {
      if let Err(e) = health_server.run(health_shutdown).await {
        error!(error = %e, "Health server failed");
      }
    }));
  }

  // ── 7. Poll scheduler ───────────────────────────────────
  let scheduler = PollScheduler::new(Duration::from_secs(config.tracker.poll_interval_seconds))
    .with_health(Arc::clone(&health));
  let scheduler_shutdown = shutdown_tx.subscribe();
  let scheduler_handle = tokio::spawn(async move {
    let cycles = scheduler.run(&cycle, scheduler_shutdown).await;
    info!(cycles, "Scheduler stopped");
  });

  info!("All tasks spawned, tracker is running");

  // ── 8. Wait for SIGINT ──────────────────────────────────
  if let Err(e) = signal::ctrl_c().await {
    error!(error = %e, "Failed to listen for SIGINT");
  }
  info!("SIGINT received, initiating graceful shutdown");

  health.mark_shutting_down();
  let _ = shutdown_tx.send(());

  // An in-flight cycle gets the HTTP timeout plus slack to finish.
  let grace = Duration::from_secs(config.http.timeout_seconds.saturating_add(5));
  if tokio::time::timeout(grace, scheduler_handle).await.is_err() {
    warn!("Cycle did not finish in time, exiting anyway");
  }

  for handle in server_handles {
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
  }

  info!("Shutdown complete");
  Ok(())
}
