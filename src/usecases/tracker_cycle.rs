//! Tracker Cycle - One Fetch, Rank, Notify Pass
//!
//! A cycle:
//! 1. Fetches every configured endpoint, one at a time
//! 2. Classifies and normalizes each payload into offers
//! 3. Ranks offers per (side, source) group
//! 4. Renders the summary
//! 5. Hands it to the notifier
//!
//! Nothing in a cycle is fatal. Fetch failures, unknown payloads and
//! delivery failures are logged and reported in the `CycleReport`;
//! the next cycle starts from scratch.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::config::EndpointConfig;
use crate::domain::normalizer::normalize_payload;
use crate::domain::offer::{Offer, Side, Source};
use crate::domain::ranking::{rank, RankedGroup};
use crate::domain::summary::{render, Summary};
use crate::ports::notifier::Notifier;
use crate::ports::price_source::PriceSource;

use super::scheduler::Cycle;

/// What happened to one endpoint during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOutcome {
  /// Payload matched a known shape.
  Parsed {
    /// Offers that passed normalization.
    offers: usize,
    /// Records dropped as invalid.
    dropped: usize,
  },
  /// Payload was unsuccessful or had an unknown shape.
  Rejected,
  /// The fetch itself failed.
  FetchFailed(String),
}

/// Per-endpoint line of a cycle report.
#[derive(Debug, Clone)]
pub struct EndpointReport {
  /// Endpoint name from config.
  pub name: String,
  pub source: Source,
  pub side: Side,
  pub outcome: EndpointOutcome,
}

/// Aggregated result of one cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
  /// One entry per configured endpoint, in fetch order.
  pub endpoints: Vec<EndpointReport>,
  /// Ranked groups the summary was rendered from.
  pub groups: Vec<RankedGroup>,
  /// The rendered summary.
  pub summary: Summary,
  /// Whether the notifier accepted the summary.
  pub delivered: bool,
}

impl CycleReport {
  /// Total valid offers across all endpoints.
  pub fn total_offers(&self) -> usize {
    self
      .endpoints
      .iter()
      .map(|e| match e.outcome {
        EndpointOutcome::Parsed { offers, .. } => offers,
        _ => 0,
      })
      .sum()
  }
}

/// Poll cycle wired to a price source and a notifier.
pub struct TrackerCycle<S: PriceSource, N: Notifier> {
  /// Upstream fetcher.
  source: Arc<S>,
  /// Summary delivery channel.
  notifier: Arc<N>,
  /// Endpoints in fetch order.
  endpoints: Vec<EndpointConfig>,
  /// Summary title.
  title: String,
  /// Optional Prometheus metrics.
  metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: PriceSource, N: Notifier> TrackerCycle<S, N> {
  /// Create a new cycle.
  pub fn new(
    source: Arc<S>,
    notifier: Arc<N>,
    endpoints: Vec<EndpointConfig>,
    title: impl Into<String>,
  ) -> Self {
    Self {
      source,
      notifier,
      endpoints,
      title: title.into(),
      metrics: None,
    }
  }

  /// Record cycle metrics into `metrics`.
  pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
    self.metrics = Some(metrics);
    self
  }

  /// Fetch and normalize every endpoint sequentially.
  pub async fn collect_offers(&self) -> (Vec<Offer>, Vec<EndpointReport>) {
    let mut offers = Vec::new();
    let mut reports = Vec::with_capacity(self.endpoints.len());

    for endpoint in &self.endpoints {
      let outcome = match self.source.fetch(endpoint).await {
        Ok(payload) => {
          let batch = normalize_payload(endpoint.source, endpoint.side, &payload);
          if batch.recognized {
            info!(
              endpoint = %endpoint.name,
              source = endpoint.source.as_str(),
              side = endpoint.side.as_str(),
              offers = batch.offers.len(),
              dropped = batch.dropped,
              "Endpoint processed"
            );
            let outcome = EndpointOutcome::Parsed {
              offers: batch.offers.len(),
              dropped: batch.dropped,
            };
            offers.extend(batch.offers);
            outcome
          } else {
            warn!(endpoint = %endpoint.name, "No offers parsed from response");
            EndpointOutcome::Rejected
          }
        }
        Err(e) => {
          error!(endpoint = %endpoint.name, url = %endpoint.url, error = %format!("{e:#}"), "Failed to fetch listing");
          EndpointOutcome::FetchFailed(format!("{e:#}"))
        }
      };

      self.record_endpoint(endpoint, &outcome);
      reports.push(EndpointReport {
        name: endpoint.name.clone(),
        source: endpoint.source,
        side: endpoint.side,
        outcome,
      });
    }

    (offers, reports)
  }

  /// Run one full cycle. Never fails; problems are in the report.
  #[instrument(skip(self), name = "tracker_cycle")]
  pub async fn run_once(&self) -> CycleReport {
    let start = Instant::now();

    let (offers, endpoints) = self.collect_offers().await;
    let groups = rank(&offers);
    let summary = render(&groups, &self.title);

    if summary.is_empty() {
      warn!("No buy or sell data found in this cycle");
    }

    let delivered = match self.notifier.deliver(&summary).await {
      Ok(()) => true,
      Err(e) => {
        error!(notifier = self.notifier.name(), error = %format!("{e:#}"), "Failed to deliver summary");
        false
      }
    };

    let report = CycleReport {
      endpoints,
      groups,
      summary,
      delivered,
    };
    self.record_cycle(&report, start);

    info!(
      offers = report.total_offers(),
      sections = report.summary.sections.len(),
      delivered,
      elapsed_ms = start.elapsed().as_millis(),
      "Cycle complete"
    );

    report
  }

  fn record_endpoint(&self, endpoint: &EndpointConfig, outcome: &EndpointOutcome) {
    let Some(metrics) = &self.metrics else {
      return;
    };
    match outcome {
      EndpointOutcome::Parsed { offers, dropped } => {
        metrics
          .offers_normalized
          .with_label_values(&[endpoint.source.as_str(), endpoint.side.as_str()])
          .inc_by(*offers as u64);
        metrics
          .records_dropped
          .with_label_values(&[endpoint.source.as_str()])
          .inc_by(*dropped as u64);
      }
      EndpointOutcome::Rejected => metrics
        .payloads_rejected
        .with_label_values(&[endpoint.name.as_str(), "unrecognized"])
        .inc(),
      EndpointOutcome::FetchFailed(_) => metrics
        .payloads_rejected
        .with_label_values(&[endpoint.name.as_str(), "fetch_error"])
        .inc(),
    }
  }

  fn record_cycle(&self, report: &CycleReport, start: Instant) {
    let Some(metrics) = &self.metrics else {
      return;
    };
    metrics.cycles.inc();
    metrics
      .cycle_duration_seconds
      .observe(start.elapsed().as_secs_f64());
    // Groups absent this cycle must not keep an old best price.
    metrics.best_price.reset();
    for group in &report.groups {
      metrics
        .best_price
        .with_label_values(&[group.source().as_str(), group.side().as_str()])
        .set(group.best().price_per_unit());
    }
    let outcome = if report.delivered { "ok" } else { "error" };
    metrics
      .deliveries
      .with_label_values(&[self.notifier.name(), outcome])
      .inc();
  }
}

#[async_trait]
impl<S: PriceSource, N: Notifier> Cycle for TrackerCycle<S, N> {
  async fn run_cycle(&self) {
    self.run_once().await;
  }
}
