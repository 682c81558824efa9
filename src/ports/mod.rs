//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer
//! requires from the outside world. Adapters implement these traits,
//! tests substitute mocks.
//!
//! Port categories:
//! - `PriceSource`: Fetch one JSON payload per configured endpoint
//! - `Notifier`: Deliver a rendered summary

pub mod notifier;
pub mod price_source;

pub use notifier::Notifier;
pub use price_source::PriceSource;
