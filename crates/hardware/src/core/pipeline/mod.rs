//! Instruction pipeline implementation.
//!
//! This module contains the out-of-order instruction pipeline. It includes
//! the following components:
//! 1. **Latches:** Per-stage instruction records.
//! 2. **PRF:** Physical register file, rename map, and free list.
//! 3. **ROB:** Reorder buffer enforcing in-order commit.
//! 4. **Stages:** Fetch, Decode/Rename, integer and multiply FU chains, Memory, and Retire.
//! 5. **Engine:** The per-cycle driver that advances the stages.

/// Per-cycle pipeline driver.
pub mod engine;

/// Per-stage pipeline latches.
pub mod latches;

/// Physical register file with renaming.
pub mod prf;

/// Reorder buffer.
pub mod rob;

/// Pipeline stage implementations.
pub mod stages;
