//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state outside the stage latches. It coordinates the following:
//! 1. **Committed State:** Architectural registers, the committed zero flag, and data memory.
//! 2. **Rename State:** The physical register file and the reorder buffer.
//! 3. **Front-end State:** Program store, program counter, and the pending flag producer.
//! 4. **Bookkeeping:** Completion counts, the halt flag, tracing, and statistics.

/// Data memory.
pub mod memory;

use crate::common::RegisterFile;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::config::Config;
use crate::core::pipeline::prf::Prf;
use crate::core::pipeline::rob::{Rob, RobTag};
use crate::isa::instruction::Instruction;
use crate::stats::SimStats;

use self::memory::DataMemory;

/// Main CPU structure containing all processor state outside the latches.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Architectural register file (committed values).
    pub regs: RegisterFile,
    /// Committed zero flag.
    pub zero_flag: bool,
    /// Data memory.
    pub memory: DataMemory,
    /// Physical register file and rename map.
    pub prf: Prf,
    /// Reorder buffer.
    pub rob: Rob,

    /// Program store.
    pub program: Vec<Instruction>,
    /// Address of the first instruction.
    pub start_pc: u32,
    /// Program Counter.
    pub pc: u32,
    /// ROB tag of the youngest renamed flag-setting instruction.
    pub flag_producer: Option<RobTag>,

    /// HALT has retired.
    pub halted: bool,
    /// Instructions committed.
    pub completed: u64,
    /// Enable instruction tracing.
    pub trace: bool,
    /// Performance statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a CPU with `program` loaded at the configured start address.
    pub fn new(program: Vec<Instruction>, config: &Config) -> Self {
        let p = &config.pipeline;
        Self {
            regs: RegisterFile::new(p.arch_regs),
            zero_flag: false,
            memory: DataMemory::new(config.memory.data_words),
            prf: Prf::new(p.prf_size, p.arch_regs),
            rob: Rob::new(p.rob_size),
            program,
            start_pc: config.general.start_pc,
            pc: config.general.start_pc,
            flag_producer: None,
            halted: false,
            completed: 0,
            trace: config.general.trace_instructions,
            stats: SimStats::default(),
        }
    }

    /// Instruction stored at `pc`, if `pc` is aligned and inside the program.
    pub fn instruction_at(&self, pc: u32) -> Option<&Instruction> {
        let offset = pc.checked_sub(self.start_pc)?;
        if offset % INSTRUCTION_SIZE != 0 {
            return None;
        }
        self.program.get((offset / INSTRUCTION_SIZE) as usize)
    }

    /// Returns true if fetch has nothing left to fetch.
    pub fn fetch_exhausted(&self) -> bool {
        self.halted || self.instruction_at(self.pc).is_none()
    }
}
