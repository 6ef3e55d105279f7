//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. Each
//! cycle it honors a pending flush, hands the previously fetched instruction to
//! Decode when Decode has room, and fetches the instruction at the current
//! program counter.

use tracing::debug;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;

/// Executes the instruction fetch stage of the pipeline.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state
/// * `fetch` - The Fetch latch (this stage's instruction)
/// * `decode` - The Decode latch (already advanced this cycle)
///
/// # Behavior
///
/// - A pending flush squashes the fetched instruction and skips this cycle's fetch
/// - Once HALT has been decoded (`busy`) nothing more is fetched
/// - A fetched instruction waits in the latch while Decode is occupied
/// - A PC outside the program (or misaligned) fetches nothing
pub fn fetch_stage(cpu: &mut Cpu, fetch: &mut Latch, decode: &mut Latch) {
    if fetch.flush {
        if fetch.is_occupied() {
            cpu.stats.flushed += 1;
            if cpu.trace {
                debug!("IF  pc={} * FLUSHED {}", fetch.pc, fetch.disassembly());
            }
        }
        fetch.squash();
        fetch.flush = false;
        fetch.stalled = false;
        return;
    }

    if fetch.busy {
        return;
    }

    if fetch.is_occupied() {
        if decode.is_occupied() {
            fetch.stalled = true;
            cpu.stats.stalls_fetch += 1;
            return;
        }
        decode.accept(fetch.take());
    }
    fetch.stalled = false;

    let pc = cpu.pc;
    let Some(inst) = cpu.instruction_at(pc).copied() else {
        return;
    };
    fetch.accept(Latch::fetched(pc, &inst));
    cpu.pc = pc.wrapping_add(INSTRUCTION_SIZE);

    if cpu.trace {
        debug!("IF  pc={} {}", pc, inst);
    }
}

