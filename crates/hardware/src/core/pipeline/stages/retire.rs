//! Retire (Commit) Stage.
//!
//! This module implements the final stage of the pipeline. Once per cycle it
//! commits the ROB head if it has completed: the destination value moves into
//! the architectural register file, the zero flag is committed, and the
//! mapping the instruction superseded is handed back to the free list.

use tracing::debug;

use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;
use crate::isa::instruction::{OpClass, Opcode};

/// Executes the retire stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state
/// * `retire` - The Retire latch, rewritten with the instruction committed this cycle
pub fn retire_stage(cpu: &mut Cpu, retire: &mut Latch) {
    retire.squash();

    let Some(entry) = cpu.rob.commit_head() else {
        return;
    };
    let Some(opcode) = entry.opcode else {
        return;
    };

    let mut value = 0;
    if let (Some(rd), Some(dest)) = (entry.rd, entry.dest)
        && let Some(v) = cpu.prf.read(dest)
    {
        cpu.regs.write(rd, v);
        value = v;
    }

    if entry.sets_flag
        && let Some(zero) = entry.zero
    {
        cpu.zero_flag = zero;
    }
    if cpu.flag_producer == Some(entry.tag) {
        cpu.flag_producer = None;
    }

    if let Some(prev) = entry.prev_dest {
        cpu.prf.release_superseded(prev);
    }

    cpu.completed += 1;
    cpu.stats.instructions_retired += 1;
    match (opcode, opcode.class()) {
        (Opcode::Halt, _) => cpu.halted = true,
        (Opcode::Load, _) => cpu.stats.inst_load += 1,
        (Opcode::Store, _) => cpu.stats.inst_store += 1,
        (_, OpClass::Multiply) => cpu.stats.inst_mul += 1,
        (_, OpClass::Control) => cpu.stats.inst_branch += 1,
        (_, OpClass::Integer) => cpu.stats.inst_alu += 1,
    }

    retire.accept(Latch {
        pc: entry.pc,
        opcode: Some(opcode),
        rd: entry.rd,
        dest: entry.dest,
        rob_tag: Some(entry.tag),
        buffer: value,
        ..Latch::default()
    });

    if cpu.trace {
        debug!(
            "WB  pc={} {} rob={} value={}",
            entry.pc, opcode, entry.tag.0, value
        );
    }
}
