//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the per-stage records of the out-of-order pipeline:
//! Fetch → Decode/Rename → {Int-FU1 → Int-FU2 → Memory | Mul-FU1 → Mul-FU2 → Mul-FU3} → Retire.
//!
//! 1. **Instruction Flow:** One `Latch` per stage carries the in-flight instruction.
//! 2. **Operand Tracking:** Producer tags captured at rename travel with the instruction.
//! 3. **Control Flags:** `busy`, `stalled`, and `flush` model structural and control hazards.

use serde::Serialize;

use crate::common::constants::MAX_SOURCES;
use crate::core::pipeline::prf::PhysReg;
use crate::core::pipeline::rob::RobTag;
use crate::isa::disasm::disassemble;
use crate::isa::instruction::{Instruction, Opcode};

/// One stage's in-flight instruction.
///
/// An empty latch (a bubble) has `opcode == None`; every other field is then
/// meaningless except the control flags, which belong to the stage itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Latch {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Operation, or `None` for a bubble.
    pub opcode: Option<Opcode>,
    /// Destination architectural register.
    pub rd: Option<usize>,
    /// Source architectural registers in operand order.
    pub rs: [Option<usize>; MAX_SOURCES],
    /// Literal operand.
    pub imm: i32,
    /// Physical register of each source's producer, captured at rename.
    ///
    /// `None` means the value came from the architectural register file and
    /// is already in `src_values`.
    pub src_tags: [Option<PhysReg>; MAX_SOURCES],
    /// Resolved source values.
    pub src_values: [i32; MAX_SOURCES],
    /// Physical register allocated for `rd`.
    pub dest: Option<PhysReg>,
    /// Reorder buffer entry of the instruction.
    pub rob_tag: Option<RobTag>,
    /// Result buffer (ALU result, product, or loaded value).
    pub buffer: i32,
    /// Effective address for loads and stores.
    pub mem_address: i32,
    /// The stage has stopped accepting work (Fetch after HALT).
    pub busy: bool,
    /// The stage could not advance its instruction this cycle.
    pub stalled: bool,
    /// A flush is pending for this stage.
    pub flush: bool,
}

impl Latch {
    /// Builds a fetch latch from a static instruction.
    pub const fn fetched(pc: u32, inst: &Instruction) -> Self {
        Self {
            pc,
            opcode: Some(inst.opcode),
            rd: inst.rd,
            rs: inst.rs,
            imm: inst.imm,
            src_tags: [None; MAX_SOURCES],
            src_values: [0; MAX_SOURCES],
            dest: None,
            rob_tag: None,
            buffer: 0,
            mem_address: 0,
            busy: false,
            stalled: false,
            flush: false,
        }
    }

    /// Returns true if the latch holds no instruction.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.opcode.is_none()
    }

    /// Returns true if the latch holds an instruction.
    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.opcode.is_some()
    }

    /// Moves the instruction out, leaving a bubble.
    ///
    /// The stage's own control flags stay behind; the receiving stage keeps its own.
    pub fn take(&mut self) -> Self {
        let flags = (self.busy, self.stalled, self.flush);
        let mut taken = std::mem::take(self);
        (self.busy, self.stalled, self.flush) = flags;
        taken.busy = false;
        taken.stalled = false;
        taken.flush = false;
        taken
    }

    /// Installs `incoming` as this stage's instruction, keeping this stage's control flags.
    pub fn accept(&mut self, incoming: Self) {
        let flags = (self.busy, self.stalled, self.flush);
        *self = incoming;
        (self.busy, self.stalled, self.flush) = flags;
    }

    /// Squashes the instruction (clears the opcode), keeping the control flags.
    pub fn squash(&mut self) {
        let _squashed = self.take();
    }

    /// Reconstructs the static instruction carried by this latch.
    pub const fn instruction(&self) -> Option<Instruction> {
        match self.opcode {
            Some(opcode) => Some(Instruction {
                opcode,
                rd: self.rd,
                rs: self.rs,
                imm: self.imm,
            }),
            None => None,
        }
    }

    /// Disassembly of the carried instruction, or `-` for a bubble.
    pub fn disassembly(&self) -> String {
        self.instruction()
            .map_or_else(|| "-".to_string(), |inst| disassemble(&inst))
    }
}

/// The full set of stage latches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Latches {
    /// Fetch stage.
    pub fetch: Latch,
    /// Decode/Rename stage.
    pub decode: Latch,
    /// Integer FU1 (compute).
    pub int_fu1: Latch,
    /// Integer FU2 (drain).
    pub int_fu2: Latch,
    /// Multiply FU1 (operand read).
    pub mul_fu1: Latch,
    /// Multiply FU2 (pass-through).
    pub mul_fu2: Latch,
    /// Multiply FU3 (compute and finalize).
    pub mul_fu3: Latch,
    /// Memory access.
    pub memory: Latch,
    /// Instruction committed this cycle.
    pub retire: Latch,
}

impl Latches {
    /// Stage names paired with their latches, head to tail.
    pub fn named(&self) -> [(&'static str, &Latch); 9] {
        [
            ("Fetch", &self.fetch),
            ("Decode/RF", &self.decode),
            ("Integer FU1", &self.int_fu1),
            ("Integer FU2", &self.int_fu2),
            ("Multiply FU1", &self.mul_fu1),
            ("Multiply FU2", &self.mul_fu2),
            ("Multiply FU3", &self.mul_fu3),
            ("Memory", &self.memory),
            ("Retire", &self.retire),
        ]
    }

    /// Returns true if no instruction is still working its way through a stage.
    ///
    /// The Retire latch only reports this cycle's commit and is not counted.
    pub fn none_in_flight(&self) -> bool {
        [
            &self.fetch,
            &self.decode,
            &self.int_fu1,
            &self.int_fu2,
            &self.mul_fu1,
            &self.mul_fu2,
            &self.mul_fu3,
            &self.memory,
        ]
        .iter()
        .all(|latch| latch.is_empty())
    }
}
