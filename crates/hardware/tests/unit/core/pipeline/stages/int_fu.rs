//! Integer Functional Unit Unit Tests.
//!
//! Verifies operand reads through captured tags, result publication to the
//! PRF and ROB, effective-address computation, and the FU2 routing decision.

use ooosim_core::core::pipeline::latches::Latch;
use ooosim_core::core::pipeline::prf::PhysReg;
use ooosim_core::core::pipeline::rob::RobState;
use ooosim_core::core::pipeline::stages::{int_fu1_stage, int_fu2_stage};
use ooosim_core::isa::{Instruction, Opcode};

use super::{decode, machine};

#[test]
fn test_result_published_in_fu1() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.decode = Latch::fetched(4000, &Instruction::movc(0, 0));
    decode(&mut cpu, &mut l).unwrap();

    int_fu1_stage(&mut cpu, &mut l.int_fu1, &mut l.int_fu2);

    assert!(l.int_fu1.is_empty());
    assert_eq!(l.int_fu2.buffer, 0);
    assert_eq!(cpu.prf.read(PhysReg(0)), Some(0));
    let head = cpu.rob.peek_head().unwrap();
    assert_eq!(head.zero, Some(true));
    assert_eq!(head.state, RobState::Issued);
}

#[test]
fn test_waits_for_unready_source() {
    let (mut cpu, mut l) = machine(Vec::new());
    let (producer, _) = cpu.prf.allocate(2).unwrap();
    cpu.prf.acquire_reader(producer);
    let mut add = Latch::fetched(4004, &Instruction::rri(Opcode::Addl, 3, 2, 10));
    add.src_tags[0] = Some(producer);
    l.int_fu1 = add;

    int_fu1_stage(&mut cpu, &mut l.int_fu1, &mut l.int_fu2);
    assert!(l.int_fu1.stalled);
    assert!(l.int_fu2.is_empty());
    assert_eq!(cpu.stats.stalls_data, 1);

    cpu.prf.write(producer, 5);
    int_fu1_stage(&mut cpu, &mut l.int_fu1, &mut l.int_fu2);
    assert!(!l.int_fu1.stalled);
    assert_eq!(l.int_fu2.src_values[0], 5);
    assert_eq!(l.int_fu2.src_tags[0], None);
    assert_eq!(l.int_fu2.buffer, 15);
    assert_eq!(cpu.prf.entry(producer).unwrap().readers, 0);
}

#[test]
fn test_stalls_behind_occupied_fu2() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.int_fu1 = Latch::fetched(4004, &Instruction::movc(1, 1));
    l.int_fu2 = Latch::fetched(4000, &Instruction::movc(0, 0));

    int_fu1_stage(&mut cpu, &mut l.int_fu1, &mut l.int_fu2);
    assert!(l.int_fu1.stalled);
    assert_eq!(l.int_fu2.pc, 4000);
    assert_eq!(cpu.stats.stalls_structural, 1);
}

#[test]
fn test_store_computes_address_from_base() {
    let (mut cpu, mut l) = machine(Vec::new());
    cpu.regs.write(1, 42);
    cpu.regs.write(2, 100);
    l.decode = Latch::fetched(4000, &Instruction::store(1, 2, 8));
    decode(&mut cpu, &mut l).unwrap();

    int_fu1_stage(&mut cpu, &mut l.int_fu1, &mut l.int_fu2);
    assert_eq!(l.int_fu2.mem_address, 108);

    int_fu2_stage(&mut cpu, &mut l.int_fu2, &mut l.memory);
    assert!(l.int_fu2.is_empty());
    assert_eq!(l.memory.opcode, Some(Opcode::Store));
    assert_eq!(cpu.rob.peek_head().unwrap().state, RobState::Issued);
}

#[test]
fn test_fu2_completes_arithmetic() {
    let (mut cpu, mut l) = machine(Vec::new());
    cpu.regs.write(1, 7);
    l.decode = Latch::fetched(4000, &Instruction::rrr(Opcode::Sub, 2, 1, 1));
    decode(&mut cpu, &mut l).unwrap();
    int_fu1_stage(&mut cpu, &mut l.int_fu1, &mut l.int_fu2);
    int_fu2_stage(&mut cpu, &mut l.int_fu2, &mut l.memory);

    assert!(l.int_fu2.is_empty());
    assert!(l.memory.is_empty());
    let head = cpu.rob.peek_head().unwrap();
    assert_eq!(head.state, RobState::Completed);
    assert_eq!(head.zero, Some(true));
}

#[test]
fn test_fu2_holds_memory_op_behind_occupied_memory() {
    let (mut cpu, mut l) = machine(Vec::new());
    l.int_fu2 = Latch::fetched(4004, &Instruction::rri(Opcode::Load, 1, 2, 0));
    l.memory = Latch::fetched(4000, &Instruction::store(1, 2, 0));

    int_fu2_stage(&mut cpu, &mut l.int_fu2, &mut l.memory);
    assert!(l.int_fu2.stalled);
    assert_eq!(l.int_fu2.pc, 4004);
    assert_eq!(l.memory.pc, 4000);
}
