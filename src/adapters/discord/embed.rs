//! Discord Webhook Payload Types
//!
//! Serialization types for the Discord webhook `execute` endpoint and
//! the mapping from a rendered `Summary` to a single embed.

use serde::Serialize;

use crate::domain::excerpt::excerpt_str;
use crate::domain::offer::Side;
use crate::domain::summary::{Section, Summary};

/// Embed accent color (goldenrod).
pub const EMBED_COLOR: u32 = 0x00DA_A520;

/// Discord rejects a field value longer than this many characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Webhook execute request body.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
  /// Overrides the webhook's default username.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  /// Rich embeds (we always send exactly one).
  pub embeds: Vec<Embed>,
}

/// A Discord rich embed.
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
  pub title: String,
  /// Only set when there are no fields to show.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub fields: Vec<EmbedField>,
  pub color: u32,
  pub footer: EmbedFooter,
  /// ISO-8601 render time.
  pub timestamp: String,
}

/// One embed field.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
  pub name: String,
  pub value: String,
  pub inline: bool,
}

/// Embed footer.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
  pub text: String,
}

/// Build the webhook body for `summary`.
pub fn webhook_payload(summary: &Summary, footer: &str, username: Option<&str>) -> WebhookPayload {
  let fields = summary.sections.iter().flat_map(section_fields).collect();

  WebhookPayload {
    username: username.map(str::to_string),
    embeds: vec![Embed {
      title: summary.title.clone(),
      description: summary.description().map(str::to_string),
      fields,
      color: EMBED_COLOR,
      footer: EmbedFooter {
        text: footer.to_string(),
      },
      timestamp: summary.timestamp.to_rfc3339(),
    }],
  }
}

/// A "best" field followed by a "top" field for one section.
fn section_fields(section: &Section) -> [EmbedField; 2] {
  let (best_icon, top_icon) = match section.side {
    Side::Buy => ("💰", "🏪"),
    Side::Sell => ("💵", "💹"),
  };
  let side = section.side;
  let source = section.source;

  [
    EmbedField {
      name: format!("{best_icon} Best {side} Price · {source}"),
      value: field_value(&section.best_line),
      inline: false,
    },
    EmbedField {
      name: format!("{top_icon} Top {side} Merchants · {source}"),
      value: field_value(&section.top_lines.join("\n")),
      inline: false,
    },
  ]
}

/// Cut `text` so that it fits a field value, counting the `...` suffix.
fn field_value(text: &str) -> String {
  excerpt_str(text, FIELD_VALUE_LIMIT - 3)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use crate::domain::offer::{Offer, Source};
  use crate::domain::ranking::rank;
  use crate::domain::summary::render_at;

  fn summary(offers: &[Offer]) -> Summary {
    let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    render_at(&rank(offers), "🔍 OSRS Gold Price Tracker", ts)
  }

  #[test]
  fn test_embed_fields_per_section() {
    let offers = vec![
      Offer::new("alice", 0.2, Some(100), Side::Buy, Source::Merchants).unwrap(),
      Offer::new("bob", 0.25, None, Side::Sell, Source::Merchants).unwrap(),
    ];
    let payload = webhook_payload(&summary(&offers), "footer", None);
    let embed = &payload.embeds[0];

    assert_eq!(embed.color, 0xDAA520);
    assert!(embed.description.is_none());
    assert_eq!(embed.fields.len(), 4);
    assert_eq!(embed.fields[0].name, "💰 Best Buy Price · merchants.to");
    assert_eq!(embed.fields[0].value, "$0.2000/M by `alice`");
    assert_eq!(embed.fields[1].name, "🏪 Top Buy Merchants · merchants.to");
    assert_eq!(embed.fields[1].value, "1) `alice` | `$0.2000/M` | `100M`");
    assert_eq!(embed.fields[2].name, "💵 Best Sell Price · merchants.to");
    assert!(embed.fields.iter().all(|f| !f.inline));
  }

  #[test]
  fn test_empty_summary_uses_description() {
    let payload = webhook_payload(&summary(&[]), "footer", Some("Gold Bot"));
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["username"], "Gold Bot");
    let embed = &json["embeds"][0];
    assert!(embed.get("fields").is_none());
    assert!(!embed["description"].as_str().unwrap().is_empty());
    assert_eq!(embed["footer"]["text"], "footer");
    assert_eq!(embed["timestamp"], "2026-03-01T12:00:00+00:00");
  }

  #[test]
  fn test_long_merchant_names_fit_field_limit() {
    let offers: Vec<_> = (0..5)
      .map(|i| {
        let name = format!("{i}{}", "w".repeat(400));
        Offer::new(name, 0.2 + f64::from(i) / 100.0, Some(10), Side::Buy, Source::Merchants).unwrap()
      })
      .collect();
    let payload = webhook_payload(&summary(&offers), "footer", None);
    let embed = &payload.embeds[0];

    assert_eq!(embed.fields.len(), 2);
    for field in &embed.fields {
      assert!(field.value.chars().count() <= FIELD_VALUE_LIMIT, "{} chars", field.value.chars().count());
    }
    assert!(embed.fields[1].value.ends_with("..."));
    assert!(embed.fields[1].value.starts_with("1) `0www"));
  }
}
