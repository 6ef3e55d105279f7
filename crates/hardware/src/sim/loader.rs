//! Program Loader.
//!
//! This module turns program text into instruction records. It performs:
//! 1. **File loading:** Reads the program file, reporting the path on failure.
//! 2. **Parsing:** One instruction per line, `OPCODE ARG, ARG, ...`; registers
//!    are written `R<n>` and literals `#<n>`. Blank lines and `;` / `//`
//!    comments are ignored.
//! 3. **Operand checking:** Each opcode's operand shape is enforced, with
//!    errors carrying the 1-based line number.
//!
//! # Usage
//!
//! ```
//! use ooosim_core::sim::loader::parse_program;
//! use ooosim_core::isa::{Instruction, Opcode};
//!
//! let program = parse_program("MOVC R0,#5\nADD R2, R0, R0 ; double\nHALT").unwrap();
//! assert_eq!(program[1], Instruction::rrr(Opcode::Add, 2, 0, 0));
//! assert_eq!(program.len(), 3);
//! ```

use std::fs;
use std::path::Path;

use crate::common::constants::MAX_SOURCES;
use crate::common::error::{SimError, SimResult};
use crate::isa::instruction::{Instruction, Opcode};

/// Reads and parses a program file.
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be read and `SimError::Parse`
/// for the first malformed line.
pub fn load_program(path: impl AsRef<Path>) -> SimResult<Vec<Instruction>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_program(&text)
}

/// Parses program text into instructions.
///
/// # Errors
///
/// Returns `SimError::Parse` for the first malformed line.
pub fn parse_program(text: &str) -> SimResult<Vec<Instruction>> {
    let mut program = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let inst = parse_line(line).map_err(|message| SimError::Parse {
            line: idx + 1,
            message,
        })?;
        program.push(inst);
    }
    Ok(program)
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find(';'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}

/// Operand kinds in written order.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Operand {
    Reg(usize),
    Lit(i32),
}

fn parse_line(line: &str) -> Result<Instruction, String> {
    let (mnemonic, rest) = line
        .split_once(|c: char| c.is_whitespace() || c == ',')
        .unwrap_or((line, ""));
    let opcode = mnemonic
        .parse::<Opcode>()
        .map_err(|e| e.to_string())?;

    let operands = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(parse_operand)
        .collect::<Result<Vec<_>, _>>()?;

    build(opcode, &operands)
}

fn parse_operand(tok: &str) -> Result<Operand, String> {
    if let Some(num) = tok.strip_prefix(['R', 'r']) {
        num.parse::<usize>()
            .map(Operand::Reg)
            .map_err(|_| format!("invalid register '{tok}'"))
    } else if let Some(num) = tok.strip_prefix('#') {
        num.parse::<i32>()
            .map(Operand::Lit)
            .map_err(|_| format!("invalid literal '{tok}'"))
    } else {
        Err(format!("unrecognized operand '{tok}'"))
    }
}

fn build(opcode: Opcode, operands: &[Operand]) -> Result<Instruction, String> {
    let regs_expected = usize::from(opcode.writes_rd()) + opcode.source_count();
    let lit_expected = usize::from(opcode.has_immediate());
    let shape_err = || {
        format!(
            "{opcode} expects {regs_expected} register(s) and {lit_expected} literal(s)"
        )
    };

    if operands.len() != regs_expected + lit_expected {
        return Err(shape_err());
    }

    let mut regs = [0_usize; MAX_SOURCES + 1];
    for (slot, op) in regs.iter_mut().zip(&operands[..regs_expected]) {
        match *op {
            Operand::Reg(r) => *slot = r,
            Operand::Lit(_) => return Err(shape_err()),
        }
    }
    let imm = match operands.get(regs_expected) {
        Some(Operand::Lit(v)) => *v,
        Some(Operand::Reg(_)) => return Err(shape_err()),
        None => 0,
    };

    let mut inst = Instruction::new(opcode);
    inst.imm = imm;
    let mut next = regs.iter().take(regs_expected).copied();
    if opcode.writes_rd() {
        inst.rd = next.next();
    }
    for (slot, reg) in inst.rs.iter_mut().zip(next) {
        *slot = Some(reg);
    }
    Ok(inst)
}
