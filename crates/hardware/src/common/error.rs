//! Simulator error definitions.
//!
//! This module defines the error type shared by every layer of the simulator. It covers:
//! 1. **Initialization Failures:** Unreadable program files, malformed program text, bad configuration.
//! 2. **Resource Exhaustion:** Rename running out of physical registers or reorder buffer slots.
//! 3. **Decode Errors:** Opcodes without execute semantics and out-of-range register indices.
//! 4. **Address Errors:** Memory accesses outside the data memory.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Finite pipeline resource that rename can run out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Physical register file free list.
    Prf,
    /// Reorder buffer slots.
    Rob,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prf => write!(f, "physical register file"),
            Self::Rob => write!(f, "reorder buffer"),
        }
    }
}

/// Errors raised while building or running a simulation.
///
/// `ResourceExhausted` is recoverable: the rename stage converts it into a
/// stall. Every other variant terminates the run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The program file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A program line could not be parsed into an instruction.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the program text.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// The configuration describes a machine that cannot make progress.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration JSON could not be deserialized.
    #[error("malformed configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// Rename found no free slot in the named resource.
    #[error("{resource} exhausted")]
    ResourceExhausted {
        /// Which resource ran out.
        resource: Resource,
    },

    /// The opcode has no defined execute semantics.
    #[error("unsupported opcode {opcode} at pc {pc}")]
    Decode {
        /// Program counter of the offending instruction.
        pc: u32,
        /// Mnemonic of the opcode.
        opcode: String,
    },

    /// An instruction names a register outside the architectural register file.
    #[error("register R{reg} out of range at pc {pc}")]
    RegisterOutOfRange {
        /// Program counter of the offending instruction.
        pc: u32,
        /// Register index as written in the program.
        reg: usize,
    },

    /// A load or store computed an address outside data memory.
    #[error("memory address {address} out of bounds at pc {pc}")]
    Address {
        /// Program counter of the offending instruction.
        pc: u32,
        /// Effective address computed by the instruction.
        address: i32,
    },
}

impl SimError {
    /// Returns true for errors that abort initialization before any cycle runs.
    pub const fn is_initialization(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Parse { .. } | Self::InvalidConfig(_) | Self::ConfigFormat(_)
        )
    }
}

/// Result alias used throughout the simulator.
pub type SimResult<T> = Result<T, SimError>;
