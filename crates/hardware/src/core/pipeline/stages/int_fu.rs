//! Integer Functional Unit.
//!
//! Two-stage chain for ADD, SUB, ADDL, SUBL, MOVC, LOAD and STORE:
//! 1. **FU1:** Reads operands, computes the ALU result (publishing it to the PRF and the zero flag to the ROB) or the effective address.
//! 2. **FU2:** Routes loads and stores to Memory and completes everything else in the ROB.

use tracing::debug;

use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;
use crate::core::pipeline::stages::read_operands;
use crate::core::units::alu::{Alu, arithmetic};
use crate::isa::instruction::Opcode;

/// Source slot holding the base register of a STORE (`STORE value, base, #imm`).
const STORE_BASE: usize = 1;

/// Executes Integer FU1.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state
/// * `fu1` - Integer FU1 latch (this stage's instruction)
/// * `fu2` - Integer FU2 latch (already advanced this cycle)
pub fn int_fu1_stage(cpu: &mut Cpu, fu1: &mut Latch, fu2: &mut Latch) {
    let Some(opcode) = fu1.opcode else {
        fu1.stalled = false;
        return;
    };

    if fu2.is_occupied() {
        cpu.stats.stalls_structural += 1;
        fu1.stalled = true;
        return;
    }

    let indices: &[usize] = match opcode {
        Opcode::Store => &[STORE_BASE],
        Opcode::Movc => &[],
        Opcode::Addl | Opcode::Subl | Opcode::Load => &[0],
        _ => &[0, 1],
    };
    if !read_operands(cpu, fu1, indices) {
        cpu.stats.stalls_data += 1;
        fu1.stalled = true;
        if cpu.trace {
            debug!("EX1 pc={} {} waiting on operands", fu1.pc, opcode);
        }
        return;
    }
    fu1.stalled = false;

    match opcode {
        Opcode::Load => {
            fu1.mem_address = arithmetic::effective_address(fu1.src_values[0], fu1.imm);
        }
        Opcode::Store => {
            fu1.mem_address = arithmetic::effective_address(fu1.src_values[STORE_BASE], fu1.imm);
        }
        _ => {
            if let Some(result) =
                Alu::execute(opcode, fu1.src_values[0], fu1.src_values[1], fu1.imm)
            {
                fu1.buffer = result;
                if let Some(dest) = fu1.dest {
                    cpu.prf.write(dest, result);
                }
                if let Some(tag) = fu1.rob_tag {
                    cpu.rob.set_zero(tag, Alu::zero_flag(result));
                }
            }
        }
    }

    if cpu.trace {
        debug!(
            "EX1 pc={} {} result={} addr={}",
            fu1.pc,
            fu1.disassembly(),
            fu1.buffer,
            fu1.mem_address
        );
    }
    fu2.accept(fu1.take());
}

/// Executes Integer FU2.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state
/// * `fu2` - Integer FU2 latch (this stage's instruction)
/// * `memory` - Memory latch (already advanced this cycle)
pub fn int_fu2_stage(cpu: &mut Cpu, fu2: &mut Latch, memory: &mut Latch) {
    let Some(opcode) = fu2.opcode else {
        fu2.stalled = false;
        return;
    };

    if opcode.is_memory() {
        if memory.is_occupied() {
            cpu.stats.stalls_structural += 1;
            fu2.stalled = true;
            return;
        }
        fu2.stalled = false;
        memory.accept(fu2.take());
        return;
    }

    fu2.stalled = false;
    if let Some(tag) = fu2.rob_tag {
        cpu.rob.complete(tag);
    }
    if cpu.trace {
        debug!("EX2 pc={} {} complete", fu2.pc, fu2.disassembly());
    }
    fu2.squash();
}
