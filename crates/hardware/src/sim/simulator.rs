//! Simulator: owns both the CPU and the pipeline side-by-side.
//!
//! The [`Simulator`] is the single owned simulation state. It provides:
//! 1. **Construction:** Validates the configuration and loads the program.
//! 2. **Stepping:** Advances the pipeline one cycle at a time.
//! 3. **Running:** Steps until the pipeline drains or a cycle budget is used up.
//! 4. **Observation:** Snapshots, latch views, and statistics.

use tracing::{debug, info};

use crate::common::error::SimResult;
use crate::config::Config;
use crate::core::Cpu;
use crate::core::pipeline::engine::Pipeline;
use crate::core::pipeline::latches::Latches;
use crate::isa::instruction::Instruction;
use crate::sim::snapshot::Snapshot;
use crate::stats::SimStats;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage and the ROB emptied with nothing left to fetch.
    Drained,
    /// The cycle budget was reached first.
    BudgetExhausted,
}

/// Top-level simulator: CPU state + pipeline latches.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// CPU state (registers, memory, PRF, ROB, stats).
    pub cpu: Cpu,
    /// Pipeline latches.
    pub pipeline: Pipeline,
}

impl Simulator {
    /// Creates a simulator running `program` on the machine described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` if `config` fails validation.
    pub fn new(program: Vec<Instruction>, config: &Config) -> SimResult<Self> {
        config.validate()?;
        info!(
            instructions = program.len(),
            prf = config.pipeline.prf_size,
            rob = config.pipeline.rob_size,
            "simulator initialized"
        );
        Ok(Self {
            cpu: Cpu::new(program, config),
            pipeline: Pipeline::new(),
        })
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// # Errors
    ///
    /// Returns decode and memory address errors raised by the stages.
    pub fn step(&mut self) -> SimResult<()> {
        self.pipeline.tick(&mut self.cpu)
    }

    /// Steps until the pipeline drains or `budget` cycles have run in total.
    ///
    /// # Errors
    ///
    /// Stops at the first stage error and returns it.
    pub fn run(&mut self, budget: u64) -> SimResult<RunOutcome> {
        self.run_with(budget, |_| {})
    }

    /// Like [`Simulator::run`], calling `on_cycle` after every completed cycle.
    ///
    /// # Errors
    ///
    /// Stops at the first stage error and returns it.
    pub fn run_with(
        &mut self,
        budget: u64,
        mut on_cycle: impl FnMut(&Self),
    ) -> SimResult<RunOutcome> {
        while !self.is_drained() {
            if self.cycles() >= budget {
                debug!(cycles = self.cycles(), "cycle budget exhausted");
                return Ok(RunOutcome::BudgetExhausted);
            }
            self.step()?;
            on_cycle(self);
        }
        info!(
            cycles = self.cycles(),
            completed = self.cpu.completed,
            "pipeline drained"
        );
        Ok(RunOutcome::Drained)
    }

    /// Returns true once no work remains.
    pub fn is_drained(&self) -> bool {
        self.pipeline.is_drained(&self.cpu)
    }

    /// Cycles simulated so far.
    pub const fn cycles(&self) -> u64 {
        self.cpu.stats.cycles
    }

    /// Current stage latches.
    pub const fn latches(&self) -> &Latches {
        &self.pipeline.latches
    }

    /// Performance statistics.
    pub const fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    /// Captures the observable machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.cpu)
    }
}
