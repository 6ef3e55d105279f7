//! Instruction Disassembler.
//!
//! Renders an [`Instruction`] back into program-text form for trace events,
//! the CLI stage dump, and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use ooosim_core::isa::instruction::{Instruction, Opcode};
//! use ooosim_core::isa::disasm::disassemble;
//!
//! assert_eq!(disassemble(&Instruction::rrr(Opcode::Add, 2, 0, 1)), "ADD R2,R0,R1");
//! assert_eq!(disassemble(&Instruction::movc(0, 5)), "MOVC R0,#5");
//! ```

use std::fmt;

use crate::isa::instruction::Instruction;

/// Disassembles an instruction into its canonical text form.
pub fn disassemble(inst: &Instruction) -> String {
    inst.to_string()
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operands: Vec<String> = Vec::with_capacity(4);
        if let Some(rd) = self.rd {
            operands.push(format!("R{rd}"));
        }
        operands.extend(self.sources().map(|rs| format!("R{rs}")));
        if self.opcode.has_immediate() {
            operands.push(format!("#{}", self.imm));
        }

        if operands.is_empty() {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, operands.join(","))
        }
    }
}
