//! Instruction records and opcode classification.
//!
//! This module defines the static form of a program line. It provides:
//! 1. **Opcode:** The closed set of mnemonics the instruction format can express.
//! 2. **Classification:** Which functional-unit chain an opcode travels through.
//! 3. **Operand Layout:** Which fields an opcode reads, writes, and whether it sets the zero flag.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::constants::MAX_SOURCES;

/// Every mnemonic the program format can express.
///
/// Only a subset has execute semantics (see [`Opcode::is_supported`]);
/// decode rejects the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    /// `ADD rd, rs1, rs2`
    Add,
    /// `SUB rd, rs1, rs2`
    Sub,
    /// `MUL rd, rs1, rs2`
    Mul,
    /// `ADDL rd, rs1, #imm`
    Addl,
    /// `SUBL rd, rs1, #imm`
    Subl,
    /// `MOVC rd, #imm`
    Movc,
    /// `LOAD rd, rs1, #imm`: `rd = mem[rs1 + imm]`
    Load,
    /// `STORE rs1, rs2, #imm`: `mem[rs2 + imm] = rs1`
    Store,
    /// `BZ #imm`: branch to `pc + imm` when the zero flag is set.
    Bz,
    /// `BNZ #imm`: branch to `pc + imm` when the zero flag is clear.
    Bnz,
    /// `HALT`: stop fetching; the run drains once it retires.
    Halt,
    /// `AND rd, rs1, rs2` (no execute semantics)
    And,
    /// `OR rd, rs1, rs2` (no execute semantics)
    Or,
    /// `XOR rd, rs1, rs2` (no execute semantics)
    Xor,
    /// `LDR rd, rs1, rs2` (no execute semantics)
    Ldr,
    /// `STR rs1, rs2, rs3` (no execute semantics)
    Str,
    /// `JUMP rs1, #imm` (no execute semantics)
    Jump,
}

/// Functional-unit chain an instruction is routed to after rename.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    /// Integer FU1 → FU2 (and Memory for loads/stores).
    Integer,
    /// Multiply FU1 → FU2 → FU3.
    Multiply,
    /// Resolved at decode; never enters a functional unit.
    Control,
}

impl Opcode {
    /// Upper-case mnemonic as written in program text.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Addl => "ADDL",
            Self::Subl => "SUBL",
            Self::Movc => "MOVC",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Bz => "BZ",
            Self::Bnz => "BNZ",
            Self::Halt => "HALT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Ldr => "LDR",
            Self::Str => "STR",
            Self::Jump => "JUMP",
        }
    }

    /// Returns true if the opcode has defined execute semantics.
    pub const fn is_supported(self) -> bool {
        !matches!(
            self,
            Self::And | Self::Or | Self::Xor | Self::Ldr | Self::Str | Self::Jump
        )
    }

    /// Functional-unit chain for this opcode.
    pub const fn class(self) -> OpClass {
        match self {
            Self::Mul => OpClass::Multiply,
            Self::Bz | Self::Bnz | Self::Halt | Self::Jump => OpClass::Control,
            _ => OpClass::Integer,
        }
    }

    /// Returns true if the opcode writes a destination register.
    pub const fn writes_rd(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::Mul
                | Self::Addl
                | Self::Subl
                | Self::Movc
                | Self::Load
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Ldr
        )
    }

    /// Returns true if completing this opcode produces a new zero flag.
    pub const fn sets_zero_flag(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Addl | Self::Subl | Self::Movc
        )
    }

    /// Returns true for loads and stores.
    pub const fn is_memory(self) -> bool {
        matches!(self, Self::Load | Self::Store | Self::Ldr | Self::Str)
    }

    /// Returns true for the zero-flag conditional branches.
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Bz | Self::Bnz)
    }

    /// Number of register source operands the opcode reads.
    pub const fn source_count(self) -> usize {
        match self {
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Ldr
            | Self::Store => 2,
            Self::Str => 3,
            Self::Addl | Self::Subl | Self::Load | Self::Jump => 1,
            Self::Movc | Self::Bz | Self::Bnz | Self::Halt => 0,
        }
    }

    /// Returns true if the opcode carries a `#literal` operand.
    pub const fn has_immediate(self) -> bool {
        matches!(
            self,
            Self::Addl
                | Self::Subl
                | Self::Movc
                | Self::Load
                | Self::Store
                | Self::Bz
                | Self::Bnz
                | Self::Jump
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Error returned when a mnemonic is not part of the instruction format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOpcode(pub String);

impl fmt::Display for UnknownOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown opcode '{}'", self.0)
    }
}

impl std::error::Error for UnknownOpcode {}

impl FromStr for Opcode {
    type Err = UnknownOpcode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_uppercase().as_str() {
            "ADD" => Self::Add,
            "SUB" => Self::Sub,
            "MUL" => Self::Mul,
            "ADDL" => Self::Addl,
            "SUBL" => Self::Subl,
            "MOVC" => Self::Movc,
            "LOAD" => Self::Load,
            "STORE" => Self::Store,
            "BZ" => Self::Bz,
            "BNZ" => Self::Bnz,
            "HALT" => Self::Halt,
            "AND" => Self::And,
            "OR" => Self::Or,
            "XOR" => Self::Xor,
            "LDR" => Self::Ldr,
            "STR" => Self::Str,
            "JUMP" => Self::Jump,
            _ => return Err(UnknownOpcode(s.to_string())),
        };
        Ok(op)
    }
}

/// One decoded program line.
///
/// Register operands are architectural indices exactly as written; range
/// checking against the configured register file happens at decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Operation.
    pub opcode: Opcode,
    /// Destination register, for opcodes that write one.
    pub rd: Option<usize>,
    /// Source registers in operand order; unused slots are `None`.
    pub rs: [Option<usize>; MAX_SOURCES],
    /// Literal operand (zero when the opcode has none).
    pub imm: i32,
}

impl Instruction {
    /// Creates an instruction with no operands.
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            rd: None,
            rs: [None; MAX_SOURCES],
            imm: 0,
        }
    }

    /// `ADD`/`SUB`/`MUL`-shaped instruction: `op rd, rs1, rs2`.
    pub const fn rrr(opcode: Opcode, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            opcode,
            rd: Some(rd),
            rs: [Some(rs1), Some(rs2), None],
            imm: 0,
        }
    }

    /// `ADDL`/`SUBL`/`LOAD`-shaped instruction: `op rd, rs1, #imm`.
    pub const fn rri(opcode: Opcode, rd: usize, rs1: usize, imm: i32) -> Self {
        Self {
            opcode,
            rd: Some(rd),
            rs: [Some(rs1), None, None],
            imm,
        }
    }

    /// `MOVC rd, #imm`.
    pub const fn movc(rd: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Movc,
            rd: Some(rd),
            rs: [None; MAX_SOURCES],
            imm,
        }
    }

    /// `STORE value, base, #offset`.
    pub const fn store(value: usize, base: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Store,
            rd: None,
            rs: [Some(value), Some(base), None],
            imm,
        }
    }

    /// `BZ #offset` / `BNZ #offset`.
    pub const fn branch(opcode: Opcode, imm: i32) -> Self {
        Self {
            opcode,
            rd: None,
            rs: [None; MAX_SOURCES],
            imm,
        }
    }

    /// Iterates the register sources that are present.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        self.rs.iter().filter_map(|r| *r)
    }
}
