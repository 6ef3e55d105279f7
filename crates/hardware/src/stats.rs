//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (IPC, CPI).
//! 2. **Instruction mix:** Counts by category (integer, multiply, load, store, branch).
//! 3. **Stalls:** Decode stalls by cause, operand-wait stalls, and memory-stage stalls.
//! 4. **Control flow:** Taken branches and fetch slots squashed by flushes.

use serde::Serialize;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Count of integer ALU instructions retired (including MOVC).
    pub inst_alu: u64,
    /// Count of multiply instructions retired.
    pub inst_mul: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of conditional branches retired.
    pub inst_branch: u64,

    /// Decode stalls because the reorder buffer was full.
    pub stalls_rob_full: u64,
    /// Decode stalls because no physical register was free.
    pub stalls_prf_empty: u64,
    /// Decode stalls because a branch's zero flag was not yet produced.
    pub stalls_flag: u64,
    /// Decode stalls because the target functional unit was occupied.
    pub stalls_fu_busy: u64,
    /// Functional-unit stalls waiting on a source operand.
    pub stalls_data: u64,
    /// Stalls where a finished instruction could not enter the next stage.
    pub stalls_structural: u64,
    /// Fetch stalls because Decode had not consumed the previous instruction.
    pub stalls_fetch: u64,

    /// Conditional branches that redirected fetch.
    pub branches_taken: u64,
    /// Conditional branches that fell through.
    pub branches_not_taken: u64,
    /// Fetched instructions squashed by a flush.
    pub flushed: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"stalls"`, `"branch"`.
/// Pass an empty slice to [`SimStats::print_sections`] to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "stalls", "branch"];

impl SimStats {
    /// Instructions retired per cycle (0 before the first cycle).
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Renders the requested statistics sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to render all sections.
    pub fn render_sections(&self, sections: &[String]) -> String {
        use std::fmt::Write as _;

        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, total: f64| (n as f64 / total) * 100.0;
        let mut out = String::new();

        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "OUT-OF-ORDER PIPELINE SIMULATION STATISTICS");
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "sim_insts                {}", self.instructions_retired);
            let _ = writeln!(out, "sim_ipc                  {:.4}", self.ipc());
            let _ = writeln!(out, "sim_cpi                  {:.4}", cyc / instr);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("instruction_mix") {
            let _ = writeln!(out, "INSTRUCTION MIX");
            for (name, n) in [
                ("op.alu", self.inst_alu),
                ("op.mul", self.inst_mul),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
            ] {
                let _ = writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n, instr));
            }
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("stalls") {
            let _ = writeln!(out, "STALLS");
            for (name, n) in [
                ("stalls.rob_full", self.stalls_rob_full),
                ("stalls.prf_empty", self.stalls_prf_empty),
                ("stalls.flag", self.stalls_flag),
                ("stalls.fu_busy", self.stalls_fu_busy),
                ("stalls.data", self.stalls_data),
                ("stalls.structural", self.stalls_structural),
                ("stalls.fetch", self.stalls_fetch),
            ] {
                let _ = writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n, cyc));
            }
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("branch") {
            let _ = writeln!(out, "CONTROL FLOW");
            let _ = writeln!(out, "  branch.taken           {}", self.branches_taken);
            let _ = writeln!(out, "  branch.not_taken       {}", self.branches_not_taken);
            let _ = writeln!(out, "  fetch.flushed          {}", self.flushed);
        }
        let _ = writeln!(out, "==========================================================");
        out
    }

    /// Prints the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }
}
