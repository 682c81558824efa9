//! Source adapter: payload shape classification.
//!
//! Each decoded payload is classified into exactly one [`SourceShape`]
//! before any record is looked at. Supporting a new marketplace means
//! adding a variant here and a mapping in `normalizer`; the compiler
//! then points at every match that needs a new arm.

use serde_json::Value;
use tracing::warn;

use super::excerpt::{excerpt, PAYLOAD_EXCERPT_CHARS};
use super::offer::Source;

/// The recognized structure of one upstream payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceShape<'a> {
    /// merchants.to reply with a truthy `success` and a `data` list.
    MerchantsListing(&'a [Value]),
    /// merchants.to reply that is flagged unsuccessful or has no list.
    MerchantsUnsuccessful,
    /// eldorado.gg paginated listing (`results` list).
    EldoradoResults(&'a [Value]),
    /// eldorado.gg single top offer (`offer` and `user` records).
    EldoradoTopOffer(&'a Value),
    /// Nothing the declared source is known to send.
    Unrecognized,
}

impl<'a> SourceShape<'a> {
    /// Classify `payload` against the shapes `source` is known to send.
    pub fn classify(source: Source, payload: &'a Value) -> Self {
        match source {
            Source::Merchants => {
                let success = payload.get("success").is_some_and(is_truthy);
                let data = payload.get("data").and_then(Value::as_array);
                match (success, data) {
                    (true, Some(items)) => Self::MerchantsListing(items),
                    _ if payload.is_object() => Self::MerchantsUnsuccessful,
                    _ => Self::Unrecognized,
                }
            }
            Source::Eldorado => {
                if let Some(results) = payload.get("results").and_then(Value::as_array) {
                    return Self::EldoradoResults(results);
                }
                let has_offer = payload.get("offer").is_some_and(Value::is_object);
                let has_user = payload.get("user").is_some_and(Value::is_object);
                if has_offer && has_user {
                    Self::EldoradoTopOffer(payload)
                } else {
                    Self::Unrecognized
                }
            }
        }
    }

    /// The raw offer records carried by this shape, in upstream order.
    pub fn records(&self) -> std::slice::Iter<'a, Value> {
        match *self {
            Self::MerchantsListing(items) | Self::EldoradoResults(items) => items.iter(),
            Self::EldoradoTopOffer(offer) => std::slice::from_ref(offer).iter(),
            Self::MerchantsUnsuccessful | Self::Unrecognized => <&[Value]>::default().iter(),
        }
    }

    /// Whether the payload matched a shape that can carry offers.
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::MerchantsUnsuccessful | Self::Unrecognized)
    }

    /// Warn about a payload that carries no offers, with a truncated excerpt.
    pub fn log_rejection(&self, source: Source, payload: &Value) {
        let reason = match self {
            Self::MerchantsUnsuccessful => "Unsuccessful API response",
            Self::Unrecognized => "Unexpected payload structure",
            _ => return,
        };
        warn!(
            source = source.as_str(),
            payload = %excerpt(payload, PAYLOAD_EXCERPT_CHARS),
            "{reason}"
        );
    }
}

/// Classify `payload` and return its raw records lazily.
///
/// Unsuccessful or unrecognized payloads are logged with a truncated
/// excerpt and return `None`. A recognized listing with no records
/// returns an empty iterator.
pub fn raw_offers(source: Source, payload: &Value) -> Option<std::slice::Iter<'_, Value>> {
    let shape = SourceShape::classify(source, payload);
    if !shape.is_recognized() {
        shape.log_rejection(source, payload);
        return None;
    }
    Some(shape.records())
}

/// JSON truthiness: `false`, `null`, zero and empty values are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merchants_success_listing() {
        let payload = json!({"success": true, "data": [{"seller_id": "a"}, {"seller_id": "b"}]});
        let shape = SourceShape::classify(Source::Merchants, &payload);
        assert!(matches!(shape, SourceShape::MerchantsListing(items) if items.len() == 2));
        assert_eq!(shape.records().count(), 2);
    }

    #[test]
    fn test_merchants_unsuccessful_yields_nothing() {
        for payload in [
            json!({"success": false, "data": [{"seller_id": "a"}]}),
            json!({"data": [{"seller_id": "a"}]}),
            json!({"success": true}),
            json!({"success": true, "data": {"seller_id": "a"}}),
        ] {
            let shape = SourceShape::classify(Source::Merchants, &payload);
            assert_eq!(shape, SourceShape::MerchantsUnsuccessful);
            assert!(raw_offers(Source::Merchants, &payload).is_none());
        }
    }

    #[test]
    fn test_merchants_truthy_success_accepted() {
        for success in [json!(1), json!("true"), json!("yes")] {
            let payload = json!({"success": success, "data": [{"seller_id": "a"}]});
            let shape = SourceShape::classify(Source::Merchants, &payload);
            assert!(shape.is_recognized(), "success {success} should be accepted");
            assert_eq!(raw_offers(Source::Merchants, &payload).map(Iterator::count), Some(1));
        }
        for success in [json!(0), json!(""), json!(null), json!([])] {
            let payload = json!({"success": success, "data": [{"seller_id": "a"}]});
            assert_eq!(
                SourceShape::classify(Source::Merchants, &payload),
                SourceShape::MerchantsUnsuccessful,
                "success {success} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_listing_is_recognized_but_empty() {
        let payload = json!({"success": true, "data": []});
        assert_eq!(raw_offers(Source::Merchants, &payload).map(Iterator::count), Some(0));
    }

    #[test]
    fn test_merchants_non_object_unrecognized() {
        let payload = json!([1, 2, 3]);
        assert_eq!(
            SourceShape::classify(Source::Merchants, &payload),
            SourceShape::Unrecognized
        );
    }

    #[test]
    fn test_eldorado_results_listing() {
        let payload = json!({"results": [{}, {}, {}], "pageIndex": 1});
        let shape = SourceShape::classify(Source::Eldorado, &payload);
        assert!(shape.is_recognized());
        assert_eq!(shape.records().count(), 3);
    }

    #[test]
    fn test_eldorado_top_offer_is_single_record() {
        let payload = json!({
            "offer": {"pricePerUnit": {"amount": 12.3}, "quantity": 50},
            "user": {"username": "Bob"}
        });
        let shape = SourceShape::classify(Source::Eldorado, &payload);
        assert!(matches!(shape, SourceShape::EldoradoTopOffer(_)));
        let records: Vec<_> = shape.records().collect();
        assert_eq!(records, vec![&payload]);
    }

    #[test]
    fn test_eldorado_partial_top_offer_unrecognized() {
        let payload = json!({"offer": {"pricePerUnit": {"amount": 1.0}}});
        assert_eq!(
            SourceShape::classify(Source::Eldorado, &payload),
            SourceShape::Unrecognized
        );
        assert!(raw_offers(Source::Eldorado, &payload).is_none());
    }

    #[test]
    fn test_merchants_shape_not_accepted_for_eldorado() {
        let payload = json!({"success": true, "data": [{}]});
        assert!(!SourceShape::classify(Source::Eldorado, &payload).is_recognized());
    }
}
