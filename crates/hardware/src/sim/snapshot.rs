//! End-of-run state snapshot.
//!
//! A [`Snapshot`] captures everything observable about a run: committed
//! registers with their validity bits, the committed zero flag, data memory,
//! completion and cycle counts, and the physical register mapping table. It
//! serializes with `serde` and renders as the textual end-of-run dump.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::Cpu;
use crate::core::pipeline::prf::PrfMapping;

/// Number of data memory words shown in the textual dump.
pub const DUMP_MEMORY_WORDS: usize = 100;

/// One architectural register in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterState {
    /// Committed value.
    pub value: i32,
    /// A committed instruction has written the register.
    pub valid: bool,
}

/// Observable machine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Architectural registers in index order.
    pub registers: Vec<RegisterState>,
    /// Committed zero flag.
    pub zero_flag: bool,
    /// Full data memory.
    pub memory: Vec<i32>,
    /// Instructions committed.
    pub completed: u64,
    /// Cycles simulated.
    pub cycles: u64,
    /// Allocated physical registers.
    pub prf: Vec<PrfMapping>,
}

impl Snapshot {
    /// Captures the state of `cpu`.
    pub fn capture(cpu: &Cpu) -> Self {
        Self {
            registers: cpu
                .regs
                .iter()
                .map(|(value, valid)| RegisterState { value, valid })
                .collect(),
            zero_flag: cpu.zero_flag,
            memory: cpu.memory.words().to_vec(),
            completed: cpu.completed,
            cycles: cpu.stats.cycles,
            prf: cpu.prf.mappings(),
        }
    }

    /// Committed value of register `idx` (zero if out of range).
    pub fn reg(&self, idx: usize) -> i32 {
        self.registers.get(idx).map_or(0, |r| r.value)
    }

    /// Renders the textual end-of-run dump.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "(sim) >> Simulation Complete");
        let _ = writeln!(
            out,
            "cycles={} completed={} zero_flag={}",
            self.cycles, self.completed, self.zero_flag
        );
        let _ = writeln!(out, "=============== RENAME TABLE ===============");
        for m in &self.prf {
            let _ = writeln!(
                out,
                " | P{:<3} | R{:<3} | Value={:<11} | ready={} | latest={} |",
                m.slot, m.arch, m.value, m.ready, m.latest
            );
        }
        let _ = writeln!(out, "============== REGISTER VALUE ==============");
        for (i, r) in self.registers.iter().enumerate() {
            let status = if r.valid { "Valid" } else { "Invalid" };
            let _ = writeln!(
                out,
                " | Register[{i}] | Value={} | status={status} |",
                r.value
            );
        }
        let _ = writeln!(out, "=============== DATA MEMORY ================");
        for (i, v) in self.memory.iter().take(DUMP_MEMORY_WORDS).enumerate() {
            let _ = writeln!(out, " | MEM[{i}] | Value={v} |");
        }
        out
    }
}
