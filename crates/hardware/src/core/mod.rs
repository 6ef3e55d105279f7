//! Core processor implementation.
//!
//! This module contains the processor state, the out-of-order instruction
//! pipeline, and the execution units the pipeline stages call into.

/// CPU state container (registers, memory, rename structures).
pub mod cpu;

/// Instruction pipeline implementation (latches, PRF, ROB, stages, driver).
pub mod pipeline;

/// Execution units (ALU).
pub mod units;

pub use self::cpu::Cpu;
