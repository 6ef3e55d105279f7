//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the arithmetic used by the integer and multiply
//! functional units. All operations act on 32-bit two's-complement values
//! and wrap on overflow.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul, and effective-address generation

/// Integer arithmetic operations (add, subtract, multiply, address generation).
pub mod arithmetic;

use crate::isa::instruction::Opcode;

/// Arithmetic Logic Unit for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Computes the result of a register-writing arithmetic opcode.
    ///
    /// `a` and `b` are the first and second source operands; `imm` is the
    /// literal. Returns `None` for opcodes that produce no ALU result.
    ///
    /// # Examples
    ///
    /// ```
    /// use ooosim_core::core::units::alu::Alu;
    /// use ooosim_core::isa::Opcode;
    ///
    /// assert_eq!(Alu::execute(Opcode::Add, 5, 10, 0), Some(15));
    /// assert_eq!(Alu::execute(Opcode::Subl, 5, 0, 7), Some(-2));
    /// assert_eq!(Alu::execute(Opcode::Movc, 0, 0, 42), Some(42));
    /// assert_eq!(Alu::execute(Opcode::Mul, i32::MAX, 2, 0), Some(-2));
    /// assert_eq!(Alu::execute(Opcode::Store, 1, 2, 3), None);
    /// ```
    pub const fn execute(op: Opcode, a: i32, b: i32, imm: i32) -> Option<i32> {
        let result = match op {
            Opcode::Add => arithmetic::add(a, b),
            Opcode::Sub => arithmetic::sub(a, b),
            Opcode::Mul => arithmetic::mul(a, b),
            Opcode::Addl => arithmetic::add(a, imm),
            Opcode::Subl => arithmetic::sub(a, imm),
            Opcode::Movc => imm,
            _ => return None,
        };
        Some(result)
    }

    /// Zero flag for a result.
    #[inline]
    pub const fn zero_flag(result: i32) -> bool {
        result == 0
    }
}
