//! Fetch Stage Unit Tests.
//!
//! Verifies PC sequencing, the hand-off to Decode, stalls behind an occupied
//! Decode latch, flush handling, and the HALT-disabled state.

use ooosim_core::core::pipeline::latches::Latch;
use ooosim_core::core::pipeline::stages::fetch_stage;
use ooosim_core::isa::{Instruction, Opcode};

use super::machine;

fn program() -> Vec<Instruction> {
    vec![
        Instruction::movc(0, 1),
        Instruction::movc(1, 2),
        Instruction::new(Opcode::Halt),
    ]
}

#[test]
fn test_fetch_then_hand_off() {
    let (mut cpu, mut l) = machine(program());

    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert_eq!(l.fetch.pc, 4000);
    assert_eq!(l.fetch.opcode, Some(Opcode::Movc));
    assert!(l.decode.is_empty());
    assert_eq!(cpu.pc, 4004);

    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert_eq!(l.decode.pc, 4000);
    assert_eq!(l.fetch.pc, 4004);
    assert_eq!(cpu.pc, 4008);
}

#[test]
fn test_stalls_while_decode_occupied() {
    let (mut cpu, mut l) = machine(program());
    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    l.decode = Latch::fetched(3996, &Instruction::movc(5, 5));

    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert!(l.fetch.stalled);
    assert_eq!(l.fetch.pc, 4000);
    assert_eq!(l.decode.pc, 3996);
    assert_eq!(cpu.pc, 4004);
    assert_eq!(cpu.stats.stalls_fetch, 1);
}

#[test]
fn test_flush_squashes_and_skips_cycle() {
    let (mut cpu, mut l) = machine(program());
    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    l.fetch.flush = true;
    l.fetch.stalled = true;

    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert!(l.fetch.is_empty());
    assert!(l.decode.is_empty());
    assert!(!l.fetch.flush);
    assert!(!l.fetch.stalled);
    assert_eq!(cpu.pc, 4004);
    assert_eq!(cpu.stats.flushed, 1);

    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert_eq!(l.fetch.pc, 4004);
}

#[test]
fn test_busy_fetches_nothing() {
    let (mut cpu, mut l) = machine(program());
    l.fetch.busy = true;
    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert!(l.fetch.is_empty());
    assert_eq!(cpu.pc, 4000);
}

#[test]
fn test_pc_outside_program() {
    let (mut cpu, mut l) = machine(program());
    cpu.pc = 4012;
    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert!(l.fetch.is_empty());
    assert!(cpu.fetch_exhausted());

    cpu.pc = 4002;
    fetch_stage(&mut cpu, &mut l.fetch, &mut l.decode);
    assert!(l.fetch.is_empty());
    assert_eq!(cpu.pc, 4002);
}
