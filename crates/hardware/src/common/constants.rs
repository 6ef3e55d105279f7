//! Global Simulator Constants.
//!
//! This module defines machine-wide constants used across the simulator. It includes:
//! 1. **Fetch Constants:** Instruction width and the reset program counter.
//! 2. **Pipeline Constants:** Functional-unit latencies and the number of source operands.
//! 3. **Register Constants:** Default architectural and physical register counts.

/// Size of one instruction in bytes; the PC advances by this amount per fetch.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Program counter of the first instruction in the code memory.
pub const CODE_BASE: u32 = 4000;

/// Maximum number of source operands an instruction may name.
pub const MAX_SOURCES: usize = 3;

/// Cycles an instruction spends in the integer functional unit chain.
pub const INT_FU_LATENCY: u64 = 2;

/// Cycles an instruction spends in the multiply functional unit chain.
pub const MUL_FU_LATENCY: u64 = 3;

/// Number of architectural registers visible to programs.
pub const ARCH_REGS: usize = 16;

/// Number of physical registers available for renaming.
pub const PHYS_REGS: usize = 24;

/// Number of reorder buffer entries.
pub const ROB_ENTRIES: usize = 8;

/// Number of 32-bit words in data memory.
pub const DATA_WORDS: usize = 4096;
