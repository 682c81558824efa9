//! Canonical offer types.
//!
//! Every upstream listing, whatever its JSON shape, ends up as an
//! [`Offer`]. Offers are built once per poll cycle and dropped after
//! the summary is rendered; nothing here is persisted.

use serde::{Deserialize, Serialize};

use super::error::RecordError;

/// Currency prefix for every rendered price.
pub const CURRENCY_PREFIX: &str = "$";

// ────────────────────────────────────────────
// Enums shared across domain, ports and config
// ────────────────────────────────────────────

/// Transaction side, seen from the tracked party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// All sides in section order.
    pub const ALL: [Self; 2] = [Self::Buy, Self::Sell];

    /// Lowercase label used in logs and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// Upstream marketplace that produced a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// merchants.to: `{"success": bool, "data": [...]}` payloads.
    Merchants,
    /// eldorado.gg: paginated `results` or a single top offer.
    Eldorado,
}

impl Source {
    /// All sources in section order.
    pub const ALL: [Self; 2] = [Self::Merchants, Self::Eldorado];

    /// Lowercase label used in logs and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merchants => "merchants",
            Self::Eldorado => "eldorado",
        }
    }

    /// Human-facing marketplace name used in section headings.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Merchants => "merchants.to",
            Self::Eldorado => "eldorado.gg",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ────────────────────────────────────────────
// Offer
// ────────────────────────────────────────────

/// A single priced listing from one merchant on one source.
///
/// Fields are private so the invariants hold for every value in
/// circulation: the merchant name is non-empty, the price is finite
/// and strictly positive, and the formatted price is always derived
/// from the numeric price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    merchant_name: String,
    price_per_unit: f64,
    formatted_price: String,
    stock_quantity: Option<u64>,
    side: Side,
    source: Source,
}

impl Offer {
    /// Build a validated offer.
    ///
    /// # Errors
    /// `MissingField` for a blank merchant name, `NonPositivePrice` for
    /// a zero, negative, NaN or infinite price.
    pub fn new(
        merchant_name: impl Into<String>,
        price_per_unit: f64,
        stock_quantity: Option<u64>,
        side: Side,
        source: Source,
    ) -> Result<Self, RecordError> {
        let merchant_name = merchant_name.into();
        if merchant_name.trim().is_empty() {
            return Err(RecordError::MissingField {
                field: "merchant_name",
            });
        }
        if !price_per_unit.is_finite() || price_per_unit <= 0.0 {
            return Err(RecordError::NonPositivePrice {
                field: "price_per_unit",
                value: price_per_unit,
            });
        }

        Ok(Self {
            merchant_name,
            price_per_unit,
            formatted_price: format_price(price_per_unit),
            stock_quantity,
            side,
            source,
        })
    }

    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    /// Price per million gold. The only ordering key.
    pub const fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }

    /// Canonical display price, e.g. `$10.5000`.
    pub fn formatted_price(&self) -> &str {
        &self.formatted_price
    }

    /// Stock in millions, when the upstream record carried one.
    pub const fn stock_quantity(&self) -> Option<u64> {
        self.stock_quantity
    }

    pub const fn side(&self) -> Side {
        self.side
    }

    pub const fn source(&self) -> Source {
        self.source
    }
}

/// Render a price with the currency prefix and four decimals.
pub fn format_price(price: f64) -> String {
    format!("{CURRENCY_PREFIX}{price:.4}")
}
