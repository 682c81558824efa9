//! Use Cases Layer - Application Workflows
//!
//! Orchestrates domain logic with port interfaces. Each use case is
//! a self-contained operation.
//!
//! Use cases:
//! - `TrackerCycle`: One fetch, normalize, rank, render, notify pass
//! - `PollScheduler`: Runs a cycle on a fixed interval until shutdown

pub mod scheduler;
pub mod tracker_cycle;

pub use scheduler::{Cycle, PollScheduler};
pub use tracker_cycle::{CycleReport, EndpointOutcome, EndpointReport, TrackerCycle};
