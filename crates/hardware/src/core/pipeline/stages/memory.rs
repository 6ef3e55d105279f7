//! Memory Access (MEM) Stage.
//!
//! This module implements the data-memory stage for loads and stores. A
//! store reads its value operand here, so it waits in this stage until the
//! value's producer has written it. Loads publish the loaded word to their
//! destination physical register.

use tracing::debug;

use crate::common::error::SimResult;
use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;
use crate::core::pipeline::stages::read_operands;
use crate::isa::instruction::Opcode;

/// Source slot holding the value register of a STORE.
const STORE_VALUE: usize = 0;

/// Executes the memory stage.
///
/// # Errors
///
/// Returns `SimError::Address` when the effective address lies outside data memory.
pub fn mem_stage(cpu: &mut Cpu, mem: &mut Latch) -> SimResult<()> {
    let Some(opcode) = mem.opcode else {
        mem.stalled = false;
        return Ok(());
    };

    match opcode {
        Opcode::Store => {
            if !read_operands(cpu, mem, &[STORE_VALUE]) {
                cpu.stats.stalls_data += 1;
                mem.stalled = true;
                return Ok(());
            }
            let value = mem.src_values[STORE_VALUE];
            cpu.memory.write(mem.pc, mem.mem_address, value)?;
            mem.buffer = value;
            if cpu.trace {
                debug!("MEM pc={} STORE mem[{}] = {}", mem.pc, mem.mem_address, value);
            }
        }
        Opcode::Load => {
            let value = cpu.memory.read(mem.pc, mem.mem_address)?;
            mem.buffer = value;
            if let Some(dest) = mem.dest {
                cpu.prf.write(dest, value);
            }
            if cpu.trace {
                debug!("MEM pc={} LOAD mem[{}] -> {}", mem.pc, mem.mem_address, value);
            }
        }
        _ => {}
    }

    mem.stalled = false;
    if let Some(tag) = mem.rob_tag {
        cpu.rob.complete(tag);
    }
    mem.squash();
    Ok(())
}
