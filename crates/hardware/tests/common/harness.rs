use ooosim_core::config::Config;
use ooosim_core::core::Cpu;
use ooosim_core::core::pipeline::latches::Latches;
use ooosim_core::isa::Instruction;
use ooosim_core::sim::loader::parse_program;
use ooosim_core::{RunOutcome, SimResult, Simulator, Snapshot};
use tracing_subscriber::EnvFilter;

/// Generous cycle budget for programs that are expected to drain.
pub const DRAIN_BUDGET: u64 = 10_000;

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Empty program on the default machine.
    pub fn new() -> Self {
        Self::with_config(Vec::new(), Config::default())
    }

    /// `program` on the default machine.
    pub fn with_program(program: Vec<Instruction>) -> Self {
        Self::with_config(program, Config::default())
    }

    /// `program` on the machine described by `config`.
    pub fn with_config(program: Vec<Instruction>, config: Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();

        let sim = Simulator::new(program, &config).expect("test config must be valid");
        Self { sim }
    }

    /// Parses program text and loads it on the default machine.
    pub fn from_source(text: &str) -> Self {
        Self::with_program(parse_program(text).expect("test program must parse"))
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// Current stage latches.
    pub fn latches(&self) -> &Latches {
        self.sim.latches()
    }

    /// Runs one cycle, returning any stage error.
    pub fn try_step(&mut self) -> SimResult<()> {
        self.sim.step()
    }

    /// Runs one cycle, panicking on a stage error.
    pub fn step(&mut self) {
        self.sim.step().expect("step failed");
    }

    /// Runs `n` cycles.
    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Runs until drained, panicking if the budget is hit or a stage fails.
    pub fn run_to_drain(&mut self) -> Snapshot {
        let outcome = self.sim.run(DRAIN_BUDGET).expect("run failed");
        assert_eq!(outcome, RunOutcome::Drained, "program did not drain");
        self.sim.snapshot()
    }

    /// Committed value of architectural register `idx`.
    pub fn reg(&self, idx: usize) -> i32 {
        self.sim.cpu.regs.read(idx)
    }

    /// Data memory word at `addr`.
    pub fn mem(&self, addr: usize) -> i32 {
        self.sim.cpu.memory.words()[addr]
    }
}
