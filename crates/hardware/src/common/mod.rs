//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** Instruction width, reset PC, default structure sizes.
//! 2. **Error Handling:** The `SimError` type and the `SimResult` alias.
//! 3. **Register Management:** The committed architectural register file.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types.
pub mod error;

/// Architectural register file implementation.
pub mod reg;

pub use error::{Resource, SimError, SimResult};
pub use reg::RegisterFile;
