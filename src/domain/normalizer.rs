//! Normalizer: raw marketplace records to canonical offers.
//!
//! Field mapping per source:
//!
//! | Source    | Merchant        | Price                       | Stock            |
//! |-----------|-----------------|-----------------------------|------------------|
//! | merchants | `seller_id`     | `gold.price` (text)         | `gold.stock`     |
//! | eldorado  | `user.username` | `offer.pricePerUnit.amount` | `offer.quantity` |
//!
//! Merchant and price are resolved first; a record missing either is
//! dropped before stock is looked at. Stock that is present but cannot
//! be read as a non-negative integer becomes absent.

use serde_json::Value;
use tracing::{debug, warn};

use super::error::RecordError;
use super::excerpt::{excerpt, RECORD_EXCERPT_CHARS};
use super::offer::{Offer, Side, Source};
use super::source_shape::raw_offers;

/// JSON paths for one source's fields.
struct FieldMap {
    merchant: (&'static str, &'static str),
    price: (&'static str, &'static str),
    stock: (&'static str, &'static str),
}

// (JSON pointer, dotted name for logs)
const MERCHANTS_FIELDS: FieldMap = FieldMap {
    merchant: ("/seller_id", "seller_id"),
    price: ("/gold/price", "gold.price"),
    stock: ("/gold/stock", "gold.stock"),
};

const ELDORADO_FIELDS: FieldMap = FieldMap {
    merchant: ("/user/username", "user.username"),
    price: ("/offer/pricePerUnit/amount", "offer.pricePerUnit.amount"),
    stock: ("/offer/quantity", "offer.quantity"),
};

const fn field_map(source: Source) -> &'static FieldMap {
    match source {
        Source::Merchants => &MERCHANTS_FIELDS,
        Source::Eldorado => &ELDORADO_FIELDS,
    }
}

/// Outcome of normalizing one payload.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Valid offers in upstream order.
    pub offers: Vec<Offer>,
    /// Records that were dropped.
    pub dropped: usize,
    /// Whether the payload matched a known shape at all.
    pub recognized: bool,
}

/// Convert one raw record into an [`Offer`].
///
/// # Errors
/// Returns the first failing required field: merchant, then price.
pub fn normalize_record(record: &Value, side: Side, source: Source) -> Result<Offer, RecordError> {
    let fields = field_map(source);

    let merchant = parse_merchant(record.pointer(fields.merchant.0), fields.merchant.1)?;
    let price = parse_price(record.pointer(fields.price.0), fields.price.1)?;
    let stock = parse_stock(record.pointer(fields.stock.0), fields.stock.1);

    Offer::new(merchant, price, stock, side, source)
}

/// Classify `payload`, then normalize every record it carries.
///
/// Invalid records are logged and counted; they never abort the batch.
pub fn normalize_payload(source: Source, side: Side, payload: &Value) -> NormalizedBatch {
    let Some(records) = raw_offers(source, payload) else {
        return NormalizedBatch::default();
    };

    let mut batch = NormalizedBatch {
        recognized: true,
        ..NormalizedBatch::default()
    };

    for record in records {
        match normalize_record(record, side, source) {
            Ok(offer) => batch.offers.push(offer),
            Err(e) => {
                batch.dropped += 1;
                warn!(
                    source = source.as_str(),
                    side = side.as_str(),
                    field = e.field(),
                    error = %e,
                    record = %excerpt(record, RECORD_EXCERPT_CHARS),
                    "Skipping invalid offer record"
                );
            }
        }
    }

    debug!(
        source = source.as_str(),
        side = side.as_str(),
        offers = batch.offers.len(),
        dropped = batch.dropped,
        "Payload normalized"
    );

    batch
}

fn parse_merchant(value: Option<&Value>, field: &'static str) -> Result<String, RecordError> {
    let name = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    if name.is_empty() {
        return Err(RecordError::MissingField { field });
    }
    Ok(name)
}

fn parse_price(value: Option<&Value>, field: &'static str) -> Result<f64, RecordError> {
    let price = match value {
        None | Some(Value::Null) => return Err(RecordError::MissingField { field }),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(RecordError::MissingField { field });
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidPrice {
                field,
                raw: s.clone(),
            })?,
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| RecordError::InvalidPrice {
            field,
            raw: n.to_string(),
        })?,
        Some(other) => {
            return Err(RecordError::InvalidPrice {
                field,
                raw: other.to_string(),
            });
        }
    };

    if !price.is_finite() || price <= 0.0 {
        return Err(RecordError::NonPositivePrice { field, value: price });
    }
    Ok(price)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_stock(value: Option<&Value>, field: &'static str) -> Option<u64> {
    let raw = value?;
    let parsed = match raw {
        Value::Null => return None,
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    if parsed.is_none() {
        debug!(
            field,
            raw = %excerpt(raw, RECORD_EXCERPT_CHARS),
            "Unreadable stock, treating as absent"
        );
    }
    parsed
}
