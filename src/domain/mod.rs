//! Domain layer - Offer normalization, ranking and rendering.
//!
//! Pure logic: no network, no clock except the render timestamp.
//! Everything here is rebuilt from scratch on every poll cycle.

pub mod error;
pub mod excerpt;
pub mod normalizer;
pub mod offer;
pub mod ranking;
pub mod source_shape;
pub mod summary;

// Re-export core types for convenience
pub use error::RecordError;
pub use normalizer::{normalize_payload, normalize_record, NormalizedBatch};
pub use offer::{Offer, Side, Source};
pub use ranking::{rank, RankDirection, RankedGroup, TOP_N};
pub use source_shape::SourceShape;
pub use summary::{render, render_at, Section, Summary};
