//! Decode / Rename (ID) Stage.
//!
//! This module implements the second stage of the pipeline. It performs the following:
//! 1. **Validation:** Rejects opcodes without execute semantics and out-of-range registers.
//! 2. **Resource Check:** Stalls when the ROB is full, no physical register is free, or the target FU is occupied.
//! 3. **Rename:** Captures producer tags (or committed values) for sources and allocates the destination.
//! 4. **Dispatch:** Appends to the ROB and routes to the integer or multiply chain.
//! 5. **Control:** Resolves BZ/BNZ against the versioned zero flag and handles HALT.

use tracing::{debug, warn};

use crate::common::constants::MAX_SOURCES;
use crate::common::error::{Resource, SimError, SimResult};
use crate::core::Cpu;
use crate::core::pipeline::latches::Latch;
use crate::core::pipeline::rob::RobAlloc;
use crate::isa::instruction::{OpClass, Opcode};

/// Executes the decode/rename stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state
/// * `decode` - The Decode latch (this stage's instruction)
/// * `int_fu1` - Integer FU1 latch (already advanced this cycle)
/// * `mul_fu1` - Multiply FU1 latch (already advanced this cycle)
/// * `fetch` - The Fetch latch, flushed on taken branches and HALT
///
/// # Errors
///
/// Returns `SimError::Decode` for opcodes without execute semantics and
/// `SimError::RegisterOutOfRange` for register operands outside the
/// architectural register file. Resource exhaustion is a stall, not an error.
pub fn decode_stage(
    cpu: &mut Cpu,
    decode: &mut Latch,
    int_fu1: &mut Latch,
    mul_fu1: &mut Latch,
    fetch: &mut Latch,
) -> SimResult<()> {
    let Some(opcode) = decode.opcode else {
        decode.stalled = false;
        return Ok(());
    };

    validate(cpu, decode, opcode)?;

    let class = opcode.class();
    let target_busy = match class {
        OpClass::Integer => int_fu1.is_occupied(),
        OpClass::Multiply => mul_fu1.is_occupied(),
        OpClass::Control => false,
    };

    match reserve(cpu, opcode) {
        Ok(()) => {}
        Err(SimError::ResourceExhausted { resource }) => {
            match resource {
                Resource::Rob => cpu.stats.stalls_rob_full += 1,
                Resource::Prf => cpu.stats.stalls_prf_empty += 1,
            }
            if cpu.trace {
                warn!("RN  pc={} {} exhausted, stalling", decode.pc, resource);
            }
            decode.stalled = true;
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    if target_busy {
        cpu.stats.stalls_fu_busy += 1;
        decode.stalled = true;
        return Ok(());
    }

    let branch_flag = if opcode.is_branch() {
        let Some(zero) = pending_zero_flag(cpu) else {
            cpu.stats.stalls_flag += 1;
            if cpu.trace {
                debug!("RN  pc={} {} waiting on zero flag", decode.pc, opcode);
            }
            decode.stalled = true;
            return Ok(());
        };
        Some(zero)
    } else {
        None
    };

    decode.stalled = false;
    let mut inst = decode.take();
    rename(cpu, &mut inst)?;

    if cpu.trace {
        debug!(
            "RN  pc={} {} rob={:?} dest={:?} srcs={:?}",
            inst.pc,
            inst.disassembly(),
            inst.rob_tag,
            inst.dest,
            inst.src_tags
        );
    }

    match class {
        OpClass::Integer => int_fu1.accept(inst),
        OpClass::Multiply => mul_fu1.accept(inst),
        OpClass::Control => resolve_control(cpu, &inst, opcode, branch_flag, fetch),
    }
    Ok(())
}

fn validate(cpu: &Cpu, latch: &Latch, opcode: Opcode) -> SimResult<()> {
    if !opcode.is_supported() {
        return Err(SimError::Decode {
            pc: latch.pc,
            opcode: opcode.mnemonic().to_string(),
        });
    }
    let regs = latch.rd.iter().chain(latch.rs.iter().flatten());
    for &reg in regs {
        if !cpu.regs.contains(reg) {
            return Err(SimError::RegisterOutOfRange { pc: latch.pc, reg });
        }
    }
    Ok(())
}

/// Checks that the ROB and (for writers) the PRF can take the instruction.
fn reserve(cpu: &Cpu, opcode: Opcode) -> SimResult<()> {
    if cpu.rob.is_full() {
        return Err(SimError::ResourceExhausted {
            resource: Resource::Rob,
        });
    }
    if opcode.writes_rd() && cpu.prf.free_count() == 0 {
        return Err(SimError::ResourceExhausted {
            resource: Resource::Prf,
        });
    }
    Ok(())
}

/// Zero flag a branch renamed now would observe, or `None` while its producer is in flight.
fn pending_zero_flag(cpu: &Cpu) -> Option<bool> {
    match cpu.flag_producer {
        None => Some(cpu.zero_flag),
        Some(tag) => cpu
            .rob
            .find_entry(tag)
            .map_or(Some(cpu.zero_flag), |entry| entry.zero),
    }
}

fn rename(cpu: &mut Cpu, inst: &mut Latch) -> SimResult<()> {
    for i in 0..MAX_SOURCES {
        let Some(arch) = inst.rs[i] else {
            continue;
        };
        match cpu.prf.lookup(arch) {
            Some(phys) => {
                cpu.prf.acquire_reader(phys);
                inst.src_tags[i] = Some(phys);
            }
            None => {
                inst.src_tags[i] = None;
                inst.src_values[i] = cpu.regs.read(arch);
            }
        }
    }

    let mut prev_dest = None;
    if let Some(rd) = inst.rd {
        let (dest, prev) = cpu.prf.allocate(rd)?;
        inst.dest = Some(dest);
        prev_dest = prev;
    }

    let Some(opcode) = inst.opcode else {
        return Ok(());
    };
    let tag = cpu.rob.allocate(RobAlloc {
        pc: inst.pc,
        opcode,
        rd: inst.rd,
        dest: inst.dest,
        prev_dest,
    })?;
    inst.rob_tag = Some(tag);

    if opcode.sets_zero_flag() {
        cpu.flag_producer = Some(tag);
    }
    Ok(())
}

fn resolve_control(
    cpu: &mut Cpu,
    inst: &Latch,
    opcode: Opcode,
    zero: Option<bool>,
    fetch: &mut Latch,
) {
    if let Some(tag) = inst.rob_tag {
        cpu.rob.complete(tag);
    }

    match opcode {
        Opcode::Halt => {
            fetch.flush = true;
            fetch.busy = true;
            if cpu.trace {
                debug!("RN  pc={} HALT, fetch disabled", inst.pc);
            }
        }
        Opcode::Bz | Opcode::Bnz => {
            let flag = zero.unwrap_or(cpu.zero_flag);
            let taken = (opcode == Opcode::Bz) == flag;
            if taken {
                cpu.pc = inst.pc.wrapping_add_signed(inst.imm);
                fetch.flush = true;
                fetch.stalled = true;
                cpu.stats.branches_taken += 1;
            } else {
                cpu.stats.branches_not_taken += 1;
            }
            if cpu.trace {
                debug!(
                    "RN  pc={} {} zero={} taken={} next_pc={}",
                    inst.pc, opcode, flag, taken, cpu.pc
                );
            }
        }
        _ => {}
    }
}
