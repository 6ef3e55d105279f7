//! Out-of-order pipeline simulator library.
//!
//! This crate implements a cycle-accurate simulator of a small out-of-order
//! processor with the following:
//! 1. **Core:** Fetch, decode/rename, integer and multiply FU chains, memory, and in-order retire.
//! 2. **Rename:** A physical register file with free list, plus a reorder buffer.
//! 3. **ISA:** A toy instruction set with zero-flag branches and HALT.
//! 4. **Simulation:** Program loader, configuration, snapshots, and statistics.

/// Common types and constants (errors, register file, machine constants).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (state, pipeline, execution units).
pub mod core;
/// Instruction set (opcodes, instruction records, disassembly).
pub mod isa;
/// Program loader, simulator driver, and snapshots.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Error type returned by every fallible operation.
pub use crate::common::{SimError, SimResult};
/// Main CPU type; holds committed state, rename structures, and stats.
pub use crate::core::Cpu;
/// Top-level simulator and its run outcome.
pub use crate::sim::{RunOutcome, Simulator, Snapshot};
