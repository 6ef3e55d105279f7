//! Simulation front end.
//!
//! Provides the program loader, the owned [`Simulator`] that drives the
//! pipeline, and the end-of-run [`Snapshot`].

/// Program text loader.
pub mod loader;

/// Top-level simulator.
pub mod simulator;

/// End-of-run state snapshot.
pub mod snapshot;

pub use simulator::{RunOutcome, Simulator};
pub use snapshot::Snapshot;
