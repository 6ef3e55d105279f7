//! Decode/Rename Stage Unit Tests.
//!
//! Verifies that the decode stage renames operands, allocates ROB entries and
//! physical registers, routes to the right functional unit, converts resource
//! exhaustion into stalls, and resolves branches and HALT.
//!
//! Tests are organised into the following categories:
//!   1. Operand capture (committed values vs. producer tags)
//!   2. Routing
//!   3. Resource stalls
//!   4. Decode errors
//!   5. Branches and HALT

use ooosim_core::common::SimError;
use ooosim_core::config::Config;
use ooosim_core::core::pipeline::latches::Latch;
use ooosim_core::core::pipeline::prf::PhysReg;
use ooosim_core::core::pipeline::rob::{RobState, RobTag};
use ooosim_core::isa::{Instruction, Opcode};
use pretty_assertions::assert_eq;

use super::{decode, machine, machine_with};

fn at(pc: u32, inst: Instruction) -> Latch {
    Latch::fetched(pc, &inst)
}

// ══════════════════════════════════════════════════════════
// 1. Operand capture
// ══════════════════════════════════════════════════════════

#[test]
fn test_unmapped_source_reads_committed_value() {
    let (mut cpu, mut l) = machine(Vec::new());
    cpu.regs.write(3, 99);
    l.decode = at(4000, Instruction::rrr(Opcode::Add, 1, 3, 3));

    decode(&mut cpu, &mut l).unwrap();

    assert!(l.decode.is_empty());
    assert_eq!(l.int_fu1.opcode, Some(Opcode::Add));
    assert_eq!(l.int_fu1.src_tags, [None, None, None]);
    assert_eq!(l.int_fu1.src_values, [99, 99, 0]);
    assert_eq!(l.int_fu1.dest, Some(PhysReg(0)));
    assert_eq!(l.int_fu1.rob_tag, Some(RobTag(1)));
    assert_eq!(cpu.prf.lookup(1), Some(PhysReg(0)));
    assert_eq!(cpu.rob.len(), 1);
}

#[test]
fn test_mapped_source_captures_tag() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4000, Instruction::movc(0, 7));
    decode(&mut cpu, &mut l).unwrap();
    l.int_fu1 = Latch::default();

    l.decode = at(4004, Instruction::rrr(Opcode::Add, 2, 0, 0));
    decode(&mut cpu, &mut l).unwrap();

    let p0 = PhysReg(0);
    assert_eq!(l.int_fu1.src_tags, [Some(p0), Some(p0), None]);
    assert_eq!(cpu.prf.entry(p0).unwrap().readers, 2);
    assert_eq!(l.int_fu1.dest, Some(PhysReg(1)));
}

#[test]
fn test_rename_records_previous_mapping() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4000, Instruction::movc(4, 1));
    decode(&mut cpu, &mut l).unwrap();
    l.int_fu1 = Latch::default();
    l.decode = at(4004, Instruction::movc(4, 2));
    decode(&mut cpu, &mut l).unwrap();

    let second = cpu.rob.find_entry(RobTag(2)).unwrap();
    assert_eq!(second.prev_dest, Some(PhysReg(0)));
    assert_eq!(second.dest, Some(PhysReg(1)));
    assert!(!cpu.prf.entry(PhysReg(0)).unwrap().latest);
    assert!(cpu.prf.latest_mappings_consistent());
}

// ══════════════════════════════════════════════════════════
// 2. Routing
// ══════════════════════════════════════════════════════════

#[test]
fn test_multiply_routes_to_mul_chain() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4000, Instruction::rrr(Opcode::Mul, 1, 2, 3));
    decode(&mut cpu, &mut l).unwrap();
    assert!(l.int_fu1.is_empty());
    assert_eq!(l.mul_fu1.opcode, Some(Opcode::Mul));
}

#[test]
fn test_store_has_no_destination() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4000, Instruction::store(1, 2, 4));
    decode(&mut cpu, &mut l).unwrap();
    assert_eq!(l.int_fu1.dest, None);
    assert_eq!(cpu.prf.free_count(), 24);
}

// ══════════════════════════════════════════════════════════
// 3. Resource stalls
// ══════════════════════════════════════════════════════════

#[test]
fn test_rob_full_stalls_without_side_effects() {
    let mut config = Config::default();
    config.pipeline.rob_size = 1;
    let (mut cpu, mut l) = machine_with(Vec::new(), &config);
    l.decode = at(4000, Instruction::movc(0, 1));
    decode(&mut cpu, &mut l).unwrap();
    l.int_fu1 = Latch::default();

    l.decode = at(4004, Instruction::movc(1, 2));
    decode(&mut cpu, &mut l).unwrap();

    assert!(l.decode.stalled);
    assert_eq!(l.decode.pc, 4004);
    assert!(l.int_fu1.is_empty());
    assert_eq!(cpu.rob.len(), 1);
    assert_eq!(cpu.prf.free_count(), 23);
    assert_eq!(cpu.prf.lookup(1), None);
    assert_eq!(cpu.stats.stalls_rob_full, 1);
}

#[test]
fn test_prf_exhausted_stalls() {
    let mut config = Config::default();
    config.pipeline.arch_regs = 2;
    config.pipeline.prf_size = 3;
    let (mut cpu, mut l) = machine_with(Vec::new(), &config);
    for (i, rd) in [0, 1, 0].into_iter().enumerate() {
        l.decode = at(4000 + 4 * i as u32, Instruction::movc(rd, 1));
        decode(&mut cpu, &mut l).unwrap();
        l.int_fu1 = Latch::default();
    }

    l.decode = at(4012, Instruction::movc(1, 1));
    decode(&mut cpu, &mut l).unwrap();

    assert!(l.decode.stalled);
    assert_eq!(cpu.rob.len(), 3);
    assert_eq!(cpu.stats.stalls_prf_empty, 1);
}

#[test]
fn test_occupied_unit_stalls() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.int_fu1 = at(3996, Instruction::movc(9, 9));
    l.decode = at(4000, Instruction::movc(0, 1));
    decode(&mut cpu, &mut l).unwrap();

    assert!(l.decode.stalled);
    assert_eq!(l.int_fu1.pc, 3996);
    assert!(cpu.rob.is_empty());
    assert_eq!(cpu.stats.stalls_fu_busy, 1);

    l.int_fu1 = Latch::default();
    decode(&mut cpu, &mut l).unwrap();
    assert!(!l.decode.stalled);
    assert_eq!(l.int_fu1.pc, 4000);
}

// ══════════════════════════════════════════════════════════
// 4. Decode errors
// ══════════════════════════════════════════════════════════

#[test]
fn test_unsupported_opcode() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4008, Instruction::rrr(Opcode::Xor, 1, 2, 3));
    let err = decode(&mut cpu, &mut l).unwrap_err();
    assert!(
        matches!(err, SimError::Decode { pc: 4008, ref opcode } if opcode == "XOR"),
        "{err}"
    );
    assert!(cpu.rob.is_empty());
}

#[test]
fn test_register_out_of_range() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4000, Instruction::rri(Opcode::Addl, 1, 16, 0));
    let err = decode(&mut cpu, &mut l).unwrap_err();
    assert!(matches!(err, SimError::RegisterOutOfRange { pc: 4000, reg: 16 }));
}

// ══════════════════════════════════════════════════════════
// 5. Branches and HALT
// ══════════════════════════════════════════════════════════

#[test]
fn test_branch_uses_committed_flag_when_no_producer() {
    let (mut cpu, mut l) = machine(Vec::new());
    cpu.zero_flag = true;
    l.decode = at(4004, Instruction::branch(Opcode::Bz, 12));
    decode(&mut cpu, &mut l).unwrap();

    assert_eq!(cpu.pc, 4016);
    assert!(l.fetch.flush);
    assert_eq!(cpu.rob.peek_head().unwrap().state, RobState::Completed);
    assert_eq!(cpu.stats.branches_taken, 1);
}

#[test]
fn test_branch_not_taken_leaves_fetch_alone() {
    let (mut cpu, mut l) = machine(Vec::new());
    cpu.pc = 4008;
    l.decode = at(4004, Instruction::branch(Opcode::Bnz, 12));
    cpu.zero_flag = true;
    decode(&mut cpu, &mut l).unwrap();

    assert_eq!(cpu.pc, 4008);
    assert!(!l.fetch.flush);
    assert_eq!(cpu.stats.branches_not_taken, 1);
}

#[test]
fn test_branch_waits_for_pending_flag() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = at(4000, Instruction::movc(0, 0));
    decode(&mut cpu, &mut l).unwrap();

    l.decode = at(4004, Instruction::branch(Opcode::Bz, 8));
    decode(&mut cpu, &mut l).unwrap();
    assert!(l.decode.stalled);
    assert_eq!(cpu.stats.stalls_flag, 1);
    assert_eq!(cpu.rob.len(), 1);

    cpu.rob.set_zero(RobTag(1), true);
    decode(&mut cpu, &mut l).unwrap();
    assert!(l.decode.is_empty());
    assert_eq!(cpu.pc, 4012);
}

#[test]
fn test_halt_disables_fetch() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.fetch = at(4004, Instruction::movc(1, 1));
    l.decode = at(4000, Instruction::new(Opcode::Halt));
    decode(&mut cpu, &mut l).unwrap();

    assert!(l.fetch.flush);
    assert!(l.fetch.busy);
    assert_eq!(cpu.rob.len(), 1);
    assert_eq!(cpu.rob.peek_head().unwrap().opcode, Some(Opcode::Halt));
}
