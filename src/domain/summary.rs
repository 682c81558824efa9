//! Renderer: ranked groups to a notification-ready summary.
//!
//! The summary is transport-agnostic. The Discord adapter turns it into
//! an embed, the console notifier into log lines.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::offer::{Offer, Side, Source};
use super::ranking::RankedGroup;

/// Default summary title.
pub const DEFAULT_TITLE: &str = "🔍 OSRS Gold Price Tracker";

/// Shown instead of sections when no source produced an offer.
pub const NO_DATA_DESCRIPTION: &str = "No price data available from any source this cycle.";

/// Unit marker appended to prices and stock (millions of gold).
const UNIT: &str = "M";

/// One rendered ranking group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Display heading, e.g. `Buy · merchants.to`.
    pub heading: String,
    pub side: Side,
    pub source: Source,
    /// Best offer, e.g. ``$0.2100/M by `alice` ``.
    pub best_line: String,
    /// Numbered lines, best first, at most five.
    pub top_lines: Vec<String>,
}

/// Everything a notifier needs for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub title: String,
    pub sections: Vec<Section>,
    /// Only meaningful when `sections` is empty.
    pub fallback_description: String,
    pub timestamp: DateTime<Utc>,
}

impl Summary {
    /// Whether the cycle produced no data at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The description to display: the fallback when there are no sections.
    pub fn description(&self) -> Option<&str> {
        self.is_empty().then_some(self.fallback_description.as_str())
    }
}

/// Render `groups` stamped with the current time.
pub fn render(groups: &[RankedGroup], title: &str) -> Summary {
    render_at(groups, title, Utc::now())
}

/// Render `groups` with an explicit timestamp.
///
/// Output depends only on the arguments.
pub fn render_at(groups: &[RankedGroup], title: &str, timestamp: DateTime<Utc>) -> Summary {
    let sections = groups
        .iter()
        .map(|group| Section {
            heading: group.label(),
            side: group.side(),
            source: group.source(),
            best_line: best_line(group.best()),
            top_lines: group
                .top()
                .iter()
                .enumerate()
                .map(|(i, offer)| ranked_line(i + 1, offer))
                .collect(),
        })
        .collect();

    Summary {
        title: title.to_string(),
        sections,
        fallback_description: NO_DATA_DESCRIPTION.to_string(),
        timestamp,
    }
}

/// Best-offer line: price, unit and merchant.
pub fn best_line(offer: &Offer) -> String {
    format!(
        "{}/{UNIT} by `{}`",
        offer.formatted_price(),
        offer.merchant_name()
    )
}

/// Numbered ranking line. The stock suffix is omitted when stock is unknown.
pub fn ranked_line(rank: usize, offer: &Offer) -> String {
    let mut line = format!(
        "{rank}) `{}` | `{}/{UNIT}`",
        offer.merchant_name(),
        offer.formatted_price()
    );
    if let Some(stock) = offer.stock_quantity() {
        line.push_str(&format!(" | `{stock}{UNIT}`"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ranking::rank;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_lines_with_and_without_stock() {
        let with = Offer::new("alice", 0.21, Some(500), Side::Buy, Source::Merchants).unwrap();
        let without = Offer::new("bob", 0.2, None, Side::Buy, Source::Merchants).unwrap();

        assert_eq!(best_line(&with), "$0.2100/M by `alice`");
        assert_eq!(ranked_line(1, &with), "1) `alice` | `$0.2100/M` | `500M`");
        assert_eq!(ranked_line(2, &without), "2) `bob` | `$0.2000/M`");
    }

    #[test]
    fn test_render_sections_follow_groups() {
        let offers = vec![
            Offer::new("a", 10.5, None, Side::Sell, Source::Merchants).unwrap(),
            Offer::new("b", 9.75, None, Side::Sell, Source::Merchants).unwrap(),
        ];
        let summary = render_at(&rank(&offers), DEFAULT_TITLE, fixed_time());

        assert_eq!(summary.title, DEFAULT_TITLE);
        assert_eq!(summary.sections.len(), 1);
        let section = &summary.sections[0];
        assert_eq!(section.heading, "Sell · merchants.to");
        assert_eq!(section.best_line, "$10.5000/M by `a`");
        assert_eq!(
            section.top_lines,
            vec!["1) `a` | `$10.5000/M`", "2) `b` | `$9.7500/M`"]
        );
        assert_eq!(summary.description(), None);
    }

    #[test]
    fn test_empty_render_uses_fallback() {
        let summary = render_at(&[], DEFAULT_TITLE, fixed_time());
        assert!(summary.is_empty());
        assert!(!summary.fallback_description.is_empty());
        assert_eq!(summary.description(), Some(NO_DATA_DESCRIPTION));
        assert_eq!(summary.timestamp, fixed_time());
    }

    #[test]
    fn test_render_is_deterministic() {
        let offers = vec![
            Offer::new("x", 1.0, Some(1), Side::Buy, Source::Eldorado).unwrap(),
            Offer::new("y", 1.0, None, Side::Buy, Source::Eldorado).unwrap(),
        ];
        let first = render_at(&rank(&offers), "t", fixed_time());
        let second = render_at(&rank(&offers), "t", fixed_time());
        assert_eq!(first, second);
    }
}
