//! Prometheus Metrics Registry - Tracker Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers cycle counts and durations, normalized and dropped records,
//! rejected payloads, delivery outcomes and the latest best prices.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, GaugeVec, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

/// Centralized Prometheus metrics for the tracker.
///
/// All metrics follow the naming convention `gold_tracker_*` and carry
/// `source`/`side` labels where they apply.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Completed poll cycles.
    pub cycles: IntCounter,
    /// Wall time per poll cycle (seconds).
    pub cycle_duration_seconds: Histogram,
    /// Offers that passed normalization.
    pub offers_normalized: IntCounterVec,
    /// Records dropped during normalization.
    pub records_dropped: IntCounterVec,
    /// Payloads that yielded nothing (fetch error, unknown shape).
    pub payloads_rejected: IntCounterVec,
    /// Summary deliveries by outcome.
    pub deliveries: IntCounterVec,
    /// Latest best price per group.
    pub best_price: GaugeVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let cycles = IntCounter::new("gold_tracker_cycles_total", "Completed poll cycles")?;

        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "gold_tracker_cycle_duration_seconds",
                "Poll cycle wall time in seconds",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;

        let offers_normalized = IntCounterVec::new(
            Opts::new(
                "gold_tracker_offers_normalized_total",
                "Offers that passed normalization",
            ),
            &["source", "side"],
        )?;

        let records_dropped = IntCounterVec::new(
            Opts::new(
                "gold_tracker_records_dropped_total",
                "Upstream records dropped as invalid",
            ),
            &["source"],
        )?;

        let payloads_rejected = IntCounterVec::new(
            Opts::new(
                "gold_tracker_payloads_rejected_total",
                "Endpoint payloads that produced no offers",
            ),
            &["endpoint", "reason"],
        )?;

        let deliveries = IntCounterVec::new(
            Opts::new("gold_tracker_deliveries_total", "Summary deliveries"),
            &["notifier", "outcome"],
        )?;

        let best_price = GaugeVec::new(
            Opts::new(
                "gold_tracker_best_price",
                "Best price per million gold in the latest cycle",
            ),
            &["source", "side"],
        )?;

        // Register all metrics
        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(offers_normalized.clone()))?;
        registry.register(Box::new(records_dropped.clone()))?;
        registry.register(Box::new(payloads_rejected.clone()))?;
        registry.register(Box::new(deliveries.clone()))?;
        registry.register(Box::new(best_price.clone()))?;

        Ok(Self {
            registry,
            cycles,
            cycle_duration_seconds,
            offers_normalized,
            records_dropped,
            payloads_rejected,
            deliveries,
            best_price,
        })
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move { metrics.render() }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
