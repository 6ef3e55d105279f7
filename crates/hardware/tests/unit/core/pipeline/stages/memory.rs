//! Memory Stage Unit Tests.

use ooosim_core::common::SimError;
use ooosim_core::core::Cpu;
use ooosim_core::core::pipeline::latches::Latch;
use ooosim_core::core::pipeline::prf::PhysReg;
use ooosim_core::core::pipeline::rob::{RobAlloc, RobState};
use ooosim_core::core::pipeline::stages::mem_stage;
use ooosim_core::isa::{Instruction, Opcode};

use super::machine;

fn in_rob(cpu: &mut Cpu, latch: &mut Latch) {
    let opcode = latch.opcode.unwrap();
    latch.rob_tag = Some(
        cpu.rob
            .allocate(RobAlloc {
                pc: latch.pc,
                opcode,
                rd: latch.rd,
                dest: latch.dest,
                prev_dest: None,
            })
            .unwrap(),
    );
}

#[test]
fn test_store_writes_word() {
    let (mut cpu, mut l) = machine(Vec::new());
    let mut store = Latch::fetched(4000, &Instruction::store(1, 2, 0));
    store.src_values[0] = 77;
    store.mem_address = 12;
    in_rob(&mut cpu, &mut store);
    l.memory = store;

    mem_stage(&mut cpu, &mut l.memory).unwrap();
    assert_eq!(cpu.memory.words()[12], 77);
    assert!(l.memory.is_empty());
    assert_eq!(cpu.rob.peek_head().unwrap().state, RobState::Completed);
}

#[test]
fn test_store_waits_for_value() {
    let (mut cpu, mut l) = machine(Vec::new());
    let (producer, _) = cpu.prf.allocate(1).unwrap();
    cpu.prf.acquire_reader(producer);
    let mut store = Latch::fetched(4000, &Instruction::store(1, 2, 0));
    store.src_tags[0] = Some(producer);
    store.mem_address = 3;
    in_rob(&mut cpu, &mut store);
    l.memory = store;

    mem_stage(&mut cpu, &mut l.memory).unwrap();
    assert!(l.memory.stalled);
    assert_eq!(cpu.memory.words()[3], 0);

    cpu.prf.write(producer, -9);
    mem_stage(&mut cpu, &mut l.memory).unwrap();
    assert!(l.memory.is_empty());
    assert!(!l.memory.stalled);
    assert_eq!(cpu.memory.words()[3], -9);
}

#[test]
fn test_load_publishes_word() {
    let (mut cpu, mut l) = machine(Vec::new());
    cpu.memory.write(0, 40, 1234).unwrap();
    let (dest, _) = cpu.prf.allocate(5).unwrap();
    let mut load = Latch::fetched(4000, &Instruction::rri(Opcode::Load, 5, 0, 40));
    load.dest = Some(dest);
    load.mem_address = 40;
    in_rob(&mut cpu, &mut load);
    l.memory = load;

    mem_stage(&mut cpu, &mut l.memory).unwrap();
    assert_eq!(cpu.prf.read(PhysReg(0)), Some(1234));
    assert_eq!(cpu.rob.peek_head().unwrap().state, RobState::Completed);
}

#[test]
fn test_out_of_range_address() {
    let (mut cpu, mut l) = machine(Vec::new());
    let mut load = Latch::fetched(4012, &Instruction::rri(Opcode::Load, 1, 0, 0));
    load.mem_address = -4;
    l.memory = load;

    let err = mem_stage(&mut cpu, &mut l.memory).unwrap_err();
    assert!(matches!(
        err,
        SimError::Address {
            pc: 4012,
            address: -4
        }
    ));
}
