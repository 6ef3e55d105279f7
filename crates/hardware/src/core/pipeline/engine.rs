//! Pipeline driver.
//!
//! This module advances every stage exactly once per cycle. Stages run from
//! the tail of the pipeline to the head (Retire, Memory, Mul-FU3, Mul-FU2,
//! Mul-FU1, Int-FU2, Int-FU1, Decode, Fetch) so that each latch is consumed
//! before its predecessor overwrites it, and an instruction advances at most
//! one stage per cycle.

use tracing::trace;

use crate::common::error::SimResult;
use crate::core::Cpu;
use crate::core::pipeline::latches::Latches;
use crate::core::pipeline::stages::{
    decode_stage, fetch_stage, int_fu1_stage, int_fu2_stage, mem_stage, mul_fu1_stage,
    mul_fu2_stage, mul_fu3_stage, retire_stage,
};

/// The stage latches of the pipeline.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    /// One latch per stage.
    pub latches: Latches,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one cycle of the entire pipeline.
    ///
    /// # Errors
    ///
    /// Propagates decode errors (unsupported opcode, register out of range)
    /// and memory address errors. The cycle is still counted.
    pub fn tick(&mut self, cpu: &mut Cpu) -> SimResult<()> {
        cpu.stats.cycles += 1;
        trace!(cycle = cpu.stats.cycles, pc = cpu.pc, "cycle begin");

        let l = &mut self.latches;
        retire_stage(cpu, &mut l.retire);
        mem_stage(cpu, &mut l.memory)?;
        mul_fu3_stage(cpu, &mut l.mul_fu3);
        mul_fu2_stage(cpu, &mut l.mul_fu2, &mut l.mul_fu3);
        mul_fu1_stage(cpu, &mut l.mul_fu1, &mut l.mul_fu2);
        int_fu2_stage(cpu, &mut l.int_fu2, &mut l.memory);
        int_fu1_stage(cpu, &mut l.int_fu1, &mut l.int_fu2);
        decode_stage(cpu, &mut l.decode, &mut l.int_fu1, &mut l.mul_fu1, &mut l.fetch)?;
        fetch_stage(cpu, &mut l.fetch, &mut l.decode);
        Ok(())
    }

    /// Returns true once no work remains anywhere in the machine.
    pub fn is_drained(&self, cpu: &Cpu) -> bool {
        self.latches.none_in_flight() && cpu.rob.is_empty() && cpu.fetch_exhausted()
    }
}
