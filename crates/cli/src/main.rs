//! Out-of-order pipeline simulator CLI.
//!
//! This binary loads a program file and runs it for at most a given number of
//! cycles. It performs:
//! 1. **Display run:** Prints every stage latch after each cycle, then the final dump.
//! 2. **Simulate run:** Runs silently, then prints the final dump.
//! 3. **Machine-readable output:** `--json` replaces the textual dump with the snapshot as JSON.
//! 4. **Selective statistics:** `--stats <section>` limits the statistics report.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::PossibleValuesParser;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ooosim_core::config::Config;
use ooosim_core::sim::loader;
use ooosim_core::stats::{STATS_SECTIONS, SimStats};
use ooosim_core::{RunOutcome, SimError, Simulator, Snapshot};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate out-of-order pipeline simulator",
    long_about = "Run a program through the out-of-order pipeline.\n\nExamples:\n  sim program.asm display 50\n  sim program.asm simulate 1000 --config machine.json --json\n  sim program.asm simulate 1000 --stats summary --stats stalls"
)]
struct Cli {
    /// Program text file.
    input: PathBuf,

    /// Run mode.
    #[arg(value_enum)]
    mode: Mode,

    /// Maximum number of cycles to simulate.
    cycles: u64,

    /// JSON configuration file (defaults apply to omitted fields).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final snapshot and statistics as JSON.
    #[arg(long)]
    json: bool,

    /// Statistics section to print (repeatable; all sections when omitted).
    #[arg(
        long = "stats",
        value_name = "SECTION",
        value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
    )]
    stats_sections: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print every stage after each cycle.
    Display,
    /// Print only the final state.
    Simulate,
}

#[derive(Serialize)]
struct Report<'a> {
    outcome: &'static str,
    snapshot: &'a Snapshot,
    stats: &'a SimStats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.mode);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_initialization() {
                error!("unable to initialize simulator: {e}");
            } else {
                error!("simulation aborted: {e}");
            }
            eprintln!("\n[!] FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(mode: Mode) {
    let default = match mode {
        Mode::Display => "debug",
        Mode::Simulate => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<Config, SimError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| SimError::Io {
                path: path.clone(),
                source,
            })?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };
    if cli.mode == Mode::Display {
        config.general.trace_instructions = true;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = load_config(cli)?;
    let program = loader::load_program(&cli.input)?;
    let mut sim = Simulator::new(program, &config)?;

    let outcome = match cli.mode {
        Mode::Display => sim.run_with(cli.cycles, print_cycle)?,
        Mode::Simulate => sim.run(cli.cycles)?,
    };

    let snapshot = sim.snapshot();
    if cli.json {
        let report = Report {
            outcome: match outcome {
                RunOutcome::Drained => "drained",
                RunOutcome::BudgetExhausted => "budget_exhausted",
            },
            snapshot: &snapshot,
            stats: sim.stats(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("could not serialize report: {e}"),
        }
    } else {
        print!("{}", snapshot.render());
        sim.stats().print_sections(&cli.stats_sections);
    }
    Ok(())
}

fn print_cycle(sim: &Simulator) {
    println!("--------------------------------");
    println!("Clock Cycle #: {}", sim.cycles());
    println!("--------------------------------");
    for (name, latch) in sim.latches().named() {
        if latch.is_empty() {
            println!("{name:<15}: Empty");
        } else {
            let stalled = if latch.stalled { " (stalled)" } else { "" };
            println!(
                "{name:<15}: pc({}) {}{stalled}",
                latch.pc,
                latch.disassembly()
            );
        }
    }

    let rob = &sim.cpu.rob;
    println!(
        "ROB ({}/{} used, {} free)",
        rob.len(),
        rob.capacity(),
        rob.free_slots()
    );
    rob.for_each_valid(|entry| {
        let zero = entry
            .zero
            .map_or_else(|| "-".to_string(), |z| z.to_string());
        println!(
            "  #{:<4} pc({}) {:?} zero={zero}",
            entry.tag.0,
            entry.pc,
            entry.state
        );
    });
}
