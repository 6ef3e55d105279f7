//! Instruction Set Architecture.
//!
//! This module defines the toy ISA executed by the pipeline. It provides:
//! 1. **Instruction:** Opcodes, operand layout, and functional-unit classification.
//! 2. **Disassembly:** Conversion of instruction records back to program text.

/// Instruction disassembler.
pub mod disasm;

/// Opcodes and instruction records.
pub mod instruction;

pub use instruction::{Instruction, OpClass, Opcode};
