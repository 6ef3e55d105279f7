//! Multiply Functional Unit.
//!
//! Three-stage chain for MUL. FU1 reads operands, FU2 passes the instruction
//! through, and FU3 computes the product, publishes it, and completes the ROB
//! entry. The destination therefore becomes ready three cycles after the MUL
//! leaves Decode.

use tracing::debug;

use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;
use crate::core::pipeline::stages::read_operands;
use crate::core::units::alu::Alu;

/// Executes Multiply FU1 (operand read).
pub fn mul_fu1_stage(cpu: &mut Cpu, fu1: &mut Latch, fu2: &mut Latch) {
    if fu1.is_empty() {
        fu1.stalled = false;
        return;
    }
    if fu2.is_occupied() {
        cpu.stats.stalls_structural += 1;
        fu1.stalled = true;
        return;
    }
    if !read_operands(cpu, fu1, &[0, 1]) {
        cpu.stats.stalls_data += 1;
        fu1.stalled = true;
        if cpu.trace {
            debug!("MU1 pc={} waiting on operands", fu1.pc);
        }
        return;
    }
    fu1.stalled = false;
    fu2.accept(fu1.take());
}

/// Executes Multiply FU2 (pass-through).
pub fn mul_fu2_stage(cpu: &mut Cpu, fu2: &mut Latch, fu3: &mut Latch) {
    if fu2.is_empty() {
        fu2.stalled = false;
        return;
    }
    if fu3.is_occupied() {
        cpu.stats.stalls_structural += 1;
        fu2.stalled = true;
        return;
    }
    fu2.stalled = false;
    fu3.accept(fu2.take());
}

/// Executes Multiply FU3 (compute and complete).
pub fn mul_fu3_stage(cpu: &mut Cpu, fu3: &mut Latch) {
    let Some(opcode) = fu3.opcode else {
        return;
    };

    if let Some(product) = Alu::execute(opcode, fu3.src_values[0], fu3.src_values[1], fu3.imm) {
        fu3.buffer = product;
        if let Some(dest) = fu3.dest {
            cpu.prf.write(dest, product);
        }
        if let Some(tag) = fu3.rob_tag {
            cpu.rob.set_zero(tag, Alu::zero_flag(product));
        }
    }
    if let Some(tag) = fu3.rob_tag {
        cpu.rob.complete(tag);
    }
    if cpu.trace {
        debug!("MU3 pc={} {} result={}", fu3.pc, fu3.disassembly(), fu3.buffer);
    }
    fu3.squash();
}
