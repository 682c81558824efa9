//! Record-level data errors.
//!
//! A `RecordError` always concerns exactly one upstream record. The
//! normalizer logs it and drops that record; the rest of the batch is
//! unaffected.

use thiserror::Error;

/// Why a single raw record could not become an `Offer`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A required field is absent, null, or an empty string.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Path of the missing field.
        field: &'static str,
    },

    /// The price field exists but is not a number.
    #[error("unparseable price in `{field}`: {raw}")]
    InvalidPrice {
        /// Path of the price field.
        field: &'static str,
        /// The raw value as it appeared upstream.
        raw: String,
    },

    /// The price parsed but is zero, negative or not finite.
    #[error("price in `{field}` must be positive and finite, got {value}")]
    NonPositivePrice {
        /// Path of the price field.
        field: &'static str,
        /// The parsed price.
        value: f64,
    },
}

impl RecordError {
    /// The field that caused the record to be dropped.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::InvalidPrice { field, .. }
            | Self::NonPositivePrice { field, .. } => *field,
        }
    }
}
